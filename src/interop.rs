//! Conversions between [`Error`] and the gRPC [`Status`] that carries it over the wire.

use crate::Error;
use std::sync::Arc;
use tonic::{Code, Status};

impl From<Status> for Error {
    fn from(status: Status) -> Self {
        match status.code() {
            Code::Cancelled | Code::DeadlineExceeded => Self::Cancelled,
            Code::Unavailable => Self::Unavailable(Box::new(status)),
            _ => Self::Remote(Box::new(status)),
        }
    }
}

impl From<Error> for Status {
    fn from(err: Error) -> Self {
        match err {
            Error::Configuration(what) => Self::failed_precondition(what),
            Error::Transport(err) => Self::unavailable(err.to_string()),
            Error::Io(err) => Self::unavailable(err.to_string()),
            Error::Cancelled => Self::cancelled("call was cancelled"),
            // A status that came from further downstream is forwarded untouched.
            Error::Unavailable(status) | Error::Remote(status) => *status,
            Error::Store(source) => {
                let mut status = Self::internal(source.to_string());
                let _chained = status.set_source(Arc::from(source));
                status
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn cancellation_codes_become_cancelled() {
        assert!(Error::from(Status::cancelled("gone")).is_cancelled());
        assert!(Error::from(Status::deadline_exceeded("late")).is_cancelled());
    }

    #[test]
    fn unavailable_is_kept_apart_from_faults() {
        assert!(matches!(
            Error::from(Status::unavailable("no route")),
            Error::Unavailable(_)
        ));
        match Error::from(Status::internal("boom")) {
            Error::Remote(status) => {
                assert_eq!(status.code(), Code::Internal);
                assert_eq!(status.message(), "boom");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn store_failure_is_an_internal_fault() {
        let status = Status::from(Error::store("disk on fire"));
        assert_eq!(status.code(), Code::Internal);
        assert_eq!(status.message(), "disk on fire");
        assert!(std::error::Error::source(&status).is_some());
    }

    #[test]
    fn remote_status_passes_through() {
        let status = Status::from(Error::Remote(Box::new(Status::permission_denied("nope"))));
        assert_eq!(status.code(), Code::PermissionDenied);
        assert_eq!(status.message(), "nope");
    }

    #[test]
    fn error_is_smaller_than_a_status() {
        assert!(std::mem::size_of::<Error>() < std::mem::size_of::<Status>());
    }

    #[test]
    fn cancellation_and_configuration_codes() {
        assert_eq!(Status::from(Error::Cancelled).code(), Code::Cancelled);
        assert_eq!(
            Status::from(Error::Configuration("no store")).code(),
            Code::FailedPrecondition
        );
    }
}
