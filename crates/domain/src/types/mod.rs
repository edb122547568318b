//! Data carried between the client layers

pub mod auth;
pub mod http;
pub mod operation;
pub mod query;
pub mod response;

pub use auth::{Credentials, LogoutRequest, RefreshRequest, Session, SessionPhase, TokenGrant};
pub use http::{HttpMethod, HttpRequest, HttpResponse, MultipartForm, RequestBody};
pub use operation::{LineItemAction, Operation, QuotaCellAction, RequestSpec, Target};
pub use query::{render_query, QueryOptions, SortOrder};
pub use response::{ApiResponse, ErrorDetail, ErrorResponse};
