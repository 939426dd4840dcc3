pub mod content_type;
pub mod tracing;

pub use content_type::json_content_type_middleware;
pub use self::tracing::{REQUEST_ID_HEADER, http_trace_layer, request_id_middleware};
