//! Translation of native failures into host errors.
//!
//! Invoked once per failure, at the outermost point before the failure
//! becomes visible to the host. Never per intermediate frame.

use std::any::Any;

use ferry_canon::Canonicalizer;
use ferry_host::{ErrorRaised, HostError, HostSession};

use crate::{Failure, FailureKind, NativeFailure};

/// Message used when an unknown failure carries no text.
pub const FALLBACK_MESSAGE: &str = "unknown native failure";

/// Outcome of classifying a [`Failure`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Classified {
    /// A native category with its (not yet canonicalized) message.
    Category(FailureKind, String),
    /// Already a host error; raised as-is.
    HostError(HostError),
    /// Already raised in the host; nothing to do.
    Raised(ErrorRaised),
}

/// Assign `failure` to exactly one category.
///
/// Unknown payloads fall back to [`FailureKind::Fatal`]; a `String` or `&str`
/// payload supplies the message, anything else gets [`FALLBACK_MESSAGE`].
pub fn classify(failure: Failure) -> Classified {
    match failure {
        Failure::Native(native) => {
            let (kind, message) = native.into_parts();
            Classified::Category(kind, message)
        }
        Failure::Host(error) => Classified::HostError(error),
        Failure::Raised(raised) => Classified::Raised(raised),
        Failure::Foreign(payload) => classify_foreign(payload),
    }
}

fn classify_foreign(payload: Box<dyn Any + Send>) -> Classified {
    let payload = match payload.downcast::<NativeFailure>() {
        Ok(native) => return classify(Failure::Native(*native)),
        Err(payload) => payload,
    };
    let payload = match payload.downcast::<HostError>() {
        Ok(error) => return Classified::HostError(*error),
        Err(payload) => payload,
    };
    let payload = match payload.downcast::<ErrorRaised>() {
        Ok(raised) => return Classified::Raised(*raised),
        Err(payload) => payload,
    };

    let message = if let Some(text) = payload.downcast_ref::<String>() {
        text.clone()
    } else if let Some(text) = payload.downcast_ref::<&'static str>() {
        (*text).to_string()
    } else {
        String::new()
    };

    if message.is_empty() {
        Classified::Category(FailureKind::Fatal, FALLBACK_MESSAGE.to_string())
    } else {
        Classified::Category(FailureKind::Fatal, message)
    }
}

/// Host error for `failure`, with its message canonicalized.
///
/// `None` when the failure was already raised in the host.
pub fn to_host_error(canonicalizer: &Canonicalizer, failure: Failure) -> Option<HostError> {
    resolve(canonicalizer, classify(failure)).ok()
}

fn resolve(canonicalizer: &Canonicalizer, classified: Classified) -> Result<HostError, ErrorRaised> {
    match classified {
        Classified::Category(kind, mut message) => {
            canonicalizer.canonicalize_in_place(&mut message);
            Ok(HostError::new(kind.host_kind(), message))
        }
        Classified::HostError(error) => Ok(error),
        Classified::Raised(raised) => Err(raised),
    }
}

/// Classify `failure` and raise the matching host error in `session`.
///
/// An already raised failure leaves the host's error slot untouched.
#[tracing::instrument(level = "debug", skip_all)]
pub fn translate_failure_to_host<S: HostSession + ?Sized>(
    session: &mut S,
    canonicalizer: &Canonicalizer,
    failure: Failure,
) -> ErrorRaised {
    match resolve(canonicalizer, classify(failure)) {
        Ok(error) => {
            tracing::debug!(kind = %error.kind(), "raising native failure in host");
            session.raise(error)
        }
        Err(raised) => {
            if !session.has_pending() {
                tracing::warn!("propagating a raised host error, but the host error slot is empty");
            }
            raised
        }
    }
}
