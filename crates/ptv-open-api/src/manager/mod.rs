//! Entity Managers
//!
//! Every add/save request runs the same pipeline:
//!
//! 1. parse the body (null body is rejected),
//! 2. run all field validators, accumulating,
//! 3. resolve the current version for updates (404 when absent),
//! 4. check the requested change against the current version,
//! 5. hand the command to the domain service.
//!
//! A non-empty error set after step 2 or 4 ends the request with a 400.

pub mod checks;

use async_trait::async_trait;
use bytes::Bytes;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::shared::api_common::parse_body;
use crate::shared::error::{ApiError, Result};
use crate::validation::ValidationErrors;

/// How a write request addresses its entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteKey {
    New,
    Id(Uuid),
    SourceId(String),
}

/// What a write addresses.
#[derive(Debug, Clone)]
pub enum Target<C> {
    New,
    Existing(C),
}

impl<C> Target<C> {
    pub fn current(&self) -> Option<&C> {
        match self {
            Target::New => None,
            Target::Existing(current) => Some(current),
        }
    }
}

#[async_trait]
pub trait EntityManager: Send + Sync {
    type Request: DeserializeOwned + Send + Sync;
    type Current: Send + Sync;
    type Output: Send;

    /// Map the version's request contract onto the canonical command.
    fn normalize(&self, request: Self::Request) -> Self::Request {
        request
    }

    /// Field validation. `Err` aborts the request: malformed nested ids and
    /// domain failures.
    async fn validate(&self, request: &Self::Request, errors: &mut ValidationErrors) -> Result<()>;

    /// Current version of an update; not-found is an `Err`.
    async fn resolve_target(&self) -> Result<Target<Self::Current>>;

    /// Checks that need the current version, such as status transitions.
    async fn check_current(
        &self,
        _request: &Self::Request,
        _current: &Self::Current,
        _errors: &mut ValidationErrors,
    ) -> Result<()> {
        Ok(())
    }

    async fn execute(&self, request: Self::Request, target: Target<Self::Current>) -> Result<Self::Output>;
}

/// Parse `body` and run it through `manager`.
pub async fn run<M: EntityManager>(manager: &M, body: &Bytes) -> Result<M::Output> {
    let request: M::Request = parse_body(body)?;
    run_request(manager, request).await
}

pub async fn run_request<M: EntityManager>(manager: &M, request: M::Request) -> Result<M::Output> {
    let request = manager.normalize(request);
    let mut errors = ValidationErrors::new();
    manager.validate(&request, &mut errors).await?;
    reject_if_any(errors)?;

    let target = manager.resolve_target().await?;

    if let Some(current) = target.current() {
        let mut errors = ValidationErrors::new();
        manager.check_current(&request, current, &mut errors).await?;
        reject_if_any(errors)?;
    }

    manager.execute(request, target).await
}

fn reject_if_any(errors: ValidationErrors) -> Result<()> {
    if errors.is_empty() {
        Ok(())
    } else {
        tracing::debug!(fields = errors.len(), "Write request rejected");
        Err(ApiError::Validation(errors))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Request {
        name: Option<String>,
        nested: Option<String>,
    }

    struct Recorder {
        existing: Option<Option<u32>>,
        steps: Mutex<Vec<&'static str>>,
    }

    impl Recorder {
        fn new(existing: Option<Option<u32>>) -> Self {
            Self { existing, steps: Mutex::new(vec![]) }
        }
    }

    #[async_trait]
    impl EntityManager for Recorder {
        type Request = Request;
        type Current = u32;
        type Output = String;

        async fn validate(&self, request: &Request, errors: &mut ValidationErrors) -> Result<()> {
            self.steps.lock().push("validate");
            if let Some(nested) = &request.nested {
                crate::validation::GuidParser::parse(nested)?;
            }
            if request.name.is_none() {
                errors.add("name", "The field is required.");
            }
            Ok(())
        }

        async fn resolve_target(&self) -> Result<Target<u32>> {
            self.steps.lock().push("resolve");
            match self.existing {
                None => Ok(Target::New),
                Some(Some(v)) => Ok(Target::Existing(v)),
                Some(None) => Err(ApiError::not_found("Thing with id 'x' not found.")),
            }
        }

        async fn check_current(&self, _r: &Request, current: &u32, errors: &mut ValidationErrors) -> Result<()> {
            self.steps.lock().push("check");
            if *current == 0 {
                errors.add("publishingStatus", "locked");
            }
            Ok(())
        }

        async fn execute(&self, request: Request, _target: Target<u32>) -> Result<String> {
            self.steps.lock().push("execute");
            Ok(request.name.unwrap_or_default())
        }
    }

    #[tokio::test]
    async fn test_null_body_rejected_before_validation() {
        let manager = Recorder::new(None);
        let result = run(&manager, &Bytes::from("null")).await;
        assert!(matches!(result, Err(ApiError::Validation(e)) if e.contains_key("request")));
        assert!(manager.steps.lock().is_empty());
    }

    #[tokio::test]
    async fn test_validation_errors_stop_before_resolution() {
        let manager = Recorder::new(Some(None));
        let result = run(&manager, &Bytes::from("{}")).await;
        assert!(matches!(result, Err(ApiError::Validation(e)) if e.contains_key("name")));
        assert_eq!(*manager.steps.lock(), vec!["validate"]);
    }

    #[tokio::test]
    async fn test_missing_current_is_not_found() {
        let manager = Recorder::new(Some(None));
        let result = run(&manager, &Bytes::from(r#"{"name":"a"}"#)).await;
        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_malformed_nested_id_aborts() {
        let manager = Recorder::new(None);
        let result = run(&manager, &Bytes::from(r#"{"nested":"bad"}"#)).await;
        assert!(matches!(result, Err(ApiError::InvalidIdentifier(_))));
    }

    #[tokio::test]
    async fn test_check_current_rejects() {
        let manager = Recorder::new(Some(Some(0)));
        let result = run(&manager, &Bytes::from(r#"{"name":"a"}"#)).await;
        assert!(matches!(result, Err(ApiError::Validation(e)) if e.contains_key("publishingStatus")));
        assert_eq!(*manager.steps.lock(), vec!["validate", "resolve", "check"]);
    }

    #[tokio::test]
    async fn test_accepted_request_executes() {
        let manager = Recorder::new(Some(Some(1)));
        let result = run(&manager, &Bytes::from(r#"{"name":"a"}"#)).await.unwrap();
        assert_eq!(result, "a");
        assert_eq!(*manager.steps.lock(), vec!["validate", "resolve", "check", "execute"]);
    }
}
