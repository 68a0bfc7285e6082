use crate::utils::error::{AppError, Result};

/// UI-observable state of one screen section.
///
/// `error` holds the flattened, human-readable message of the last failure;
/// `data` keeps its previous value when a load fails.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScreenState<T> {
    pub data: T,
    pub loading: bool,
    pub error: Option<String>,
}

impl<T> ScreenState<T> {
    pub fn begin(&mut self) {
        self.loading = true;
        self.error = None;
    }

    pub fn finish(&mut self, result: Result<T>) {
        self.finish_with(result, AppError::user_friendly_message);
    }

    pub fn finish_with<F>(&mut self, result: Result<T>, describe: F)
    where
        F: FnOnce(&AppError) -> String,
    {
        match result {
            Ok(data) => self.data = data,
            Err(e) => {
                tracing::warn!("Load failed: {} ({:?})", e, e.category());
                self.error = Some(describe(&e));
            }
        }
        self.loading = false;
    }

    pub fn is_failed(&self) -> bool {
        self.error.is_some()
    }
}
