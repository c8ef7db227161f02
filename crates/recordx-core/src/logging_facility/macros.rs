//! Canonical logging macros
//!
//! These macros expand to `tracing` events with the canonical
//! `component` / `op` / `event` fields, so callers only need a dependency
//! on `recordx-core`.

/// Log the start of an operation
///
/// # Example
///
/// ```
/// # use recordx_core::log_op_start;
/// log_op_start!("update_record");
/// log_op_start!("update_record", entity_id = "42");
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr) => {
        $crate::__private::tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::__private::schema::EVENT_START,
        );
    };
    ($op:expr, $($field:tt)*) => {
        $crate::__private::tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::__private::schema::EVENT_START,
            $($field)*
        );
    };
}

/// Log the successful end of an operation
///
/// # Example
///
/// ```
/// # use recordx_core::log_op_end;
/// log_op_end!("update_record", duration_ms = 3);
/// log_op_end!("update_record", duration_ms = 3, passed = true);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr) => {
        $crate::__private::tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::__private::schema::EVENT_END,
            duration_ms = $duration,
        );
    };
    ($op:expr, duration_ms = $duration:expr, $($field:tt)*) => {
        $crate::__private::tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::__private::schema::EVENT_END,
            duration_ms = $duration,
            $($field)*
        );
    };
}

/// Log an operation error
///
/// Accepts anything convertible into [`ExError`](crate::errors::ExError).
///
/// # Example
///
/// ```
/// # use recordx_core::{log_op_error, errors::RecordXError};
/// let err = RecordXError::MissingAction { matcher: "destroy_record".to_string() };
/// log_op_error!("destroy_record", err, duration_ms = 0);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr) => {{
        let ex_err: $crate::errors::ExError = $err.into();
        $crate::__private::tracing::error!(
            component = module_path!(),
            op = $op,
            event = $crate::__private::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err_kind = ?ex_err.kind(),
            err_code = ex_err.code(),
        );
    }};
    ($op:expr, $err:expr, duration_ms = $duration:expr, $($field:tt)*) => {{
        let ex_err: $crate::errors::ExError = $err.into();
        $crate::__private::tracing::error!(
            component = module_path!(),
            op = $op,
            event = $crate::__private::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err_kind = ?ex_err.kind(),
            err_code = ex_err.code(),
            $($field)*
        );
    }};
}
