//! Resource endpoints expressed as data
//!
//! Every API call the client knows about is one [`Operation`] variant. An
//! operation is validated and turned into a [`RequestSpec`] before any token
//! is touched, so bad arguments never cost a round trip.

use serde_json::Value;

use crate::config::Endpoint;
use crate::constants::{MULTIPART_FILE_FIELD, MULTIPART_MESSAGE_FIELD};
use crate::errors::{Result, SamplifyError};
use crate::types::http::{HttpMethod, MultipartForm, RequestBody};
use crate::types::query::{render_query, QueryOptions};
use crate::validation::{require_non_empty, require_non_zero, validate_field_schedule};

/// State transitions a line item accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineItemAction {
    Launch,
    Pause,
    Close,
}

crate::impl_wire_name!(LineItemAction {
    Launch => "launch",
    Pause => "pause",
    Close => "close",
});

/// Quota cells can only be launched or paused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuotaCellAction {
    Launch,
    Pause,
}

crate::impl_wire_name!(QuotaCellAction {
    Launch => "launch",
    Pause => "pause",
});

impl TryFrom<LineItemAction> for QuotaCellAction {
    type Error = SamplifyError;

    fn try_from(action: LineItemAction) -> Result<Self> {
        match action {
            LineItemAction::Launch => Ok(Self::Launch),
            LineItemAction::Pause => Ok(Self::Pause),
            LineItemAction::Close => Err(SamplifyError::Validation(
                "quota cell action must be launch or pause".to_string(),
            )),
        }
    }
}

/// Where a request is sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// One of the configured base URLs.
    Endpoint(Endpoint),
    /// A full URL handed out by the server, e.g. an event action link.
    Absolute(String),
}

/// A validated request ready for dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestSpec {
    pub method: HttpMethod,
    pub target: Target,
    pub path: String,
    pub body: RequestBody,
}

/// A call against the Samplify API.
///
/// Request bodies are passed as JSON values; response bodies come back raw
/// for the caller to decode.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    GetInvoicesSummary { query: Option<QueryOptions> },
    CreateProject { project: Value },
    UpdateProject { ext_project_id: String, project: Value },
    BuyProject { ext_project_id: String, buy: Value },
    CloseProject { ext_project_id: String },
    ListProjects { query: Option<QueryOptions> },
    GetProject { ext_project_id: String },
    GetProjectReport { ext_project_id: String },
    GetDetailedProjectReport { ext_project_id: String },
    GetInvoice { ext_project_id: String },
    GetFeasibility { ext_project_id: String, query: Option<QueryOptions> },
    UploadReconcile { ext_project_id: String, file_name: String, file: Vec<u8>, message: String },
    GetProjectPermissions { ext_project_id: String },
    UpsertProjectPermissions { ext_project_id: String, permissions: Value },

    AddLineItem { ext_project_id: String, line_item: Value },
    UpdateLineItem { ext_project_id: String, ext_line_item_id: String, line_item: Value },
    UpdateLineItemState { ext_project_id: String, ext_line_item_id: String, action: LineItemAction },
    SetQuotaCellStatus {
        ext_project_id: String,
        ext_line_item_id: String,
        quota_cell_id: String,
        action: QuotaCellAction,
    },
    ListLineItems { ext_project_id: String, query: Option<QueryOptions> },
    GetLineItem { ext_project_id: String, ext_line_item_id: String },
    GetDetailedLineItemReport { ext_project_id: String, ext_line_item_id: String },

    GetCountries { query: Option<QueryOptions> },
    GetAttributes { country_code: String, language_code: String, query: Option<QueryOptions> },
    GetSurveyTopics { query: Option<QueryOptions> },
    GetSources { query: Option<QueryOptions> },

    ListEvents { query: Option<QueryOptions> },
    GetEvent { event_id: String },
    AcceptEvent { accept_url: String },
    RejectEvent { reject_url: String },

    GetUserInfo,
    GetCompanyUsers,
    GetTeams,
    GetRoles { query: Option<QueryOptions> },
    GetStudyMetadata,

    CreateTemplate { template: Value },
    UpdateTemplate { id: u64, template: Value },
    ListTemplates { country_code: String, language_code: String, query: Option<QueryOptions> },
    DeleteTemplate { id: u64 },

    HealthCheck,
}

impl Operation {
    /// Stable name used in log spans.
    pub fn name(&self) -> &'static str {
        match self {
            Self::GetInvoicesSummary { .. } => "get_invoices_summary",
            Self::CreateProject { .. } => "create_project",
            Self::UpdateProject { .. } => "update_project",
            Self::BuyProject { .. } => "buy_project",
            Self::CloseProject { .. } => "close_project",
            Self::ListProjects { .. } => "list_projects",
            Self::GetProject { .. } => "get_project",
            Self::GetProjectReport { .. } => "get_project_report",
            Self::GetDetailedProjectReport { .. } => "get_detailed_project_report",
            Self::GetInvoice { .. } => "get_invoice",
            Self::GetFeasibility { .. } => "get_feasibility",
            Self::UploadReconcile { .. } => "upload_reconcile",
            Self::GetProjectPermissions { .. } => "get_project_permissions",
            Self::UpsertProjectPermissions { .. } => "upsert_project_permissions",
            Self::AddLineItem { .. } => "add_line_item",
            Self::UpdateLineItem { .. } => "update_line_item",
            Self::UpdateLineItemState { .. } => "update_line_item_state",
            Self::SetQuotaCellStatus { .. } => "set_quota_cell_status",
            Self::ListLineItems { .. } => "list_line_items",
            Self::GetLineItem { .. } => "get_line_item",
            Self::GetDetailedLineItemReport { .. } => "get_detailed_line_item_report",
            Self::GetCountries { .. } => "get_countries",
            Self::GetAttributes { .. } => "get_attributes",
            Self::GetSurveyTopics { .. } => "get_survey_topics",
            Self::GetSources { .. } => "get_sources",
            Self::ListEvents { .. } => "list_events",
            Self::GetEvent { .. } => "get_event",
            Self::AcceptEvent { .. } => "accept_event",
            Self::RejectEvent { .. } => "reject_event",
            Self::GetUserInfo => "get_user_info",
            Self::GetCompanyUsers => "get_company_users",
            Self::GetTeams => "get_teams",
            Self::GetRoles { .. } => "get_roles",
            Self::GetStudyMetadata => "get_study_metadata",
            Self::CreateTemplate { .. } => "create_template",
            Self::UpdateTemplate { .. } => "update_template",
            Self::ListTemplates { .. } => "list_templates",
            Self::DeleteTemplate { .. } => "delete_template",
            Self::HealthCheck => "health_check",
        }
    }

    /// Check argument preconditions without building the request.
    ///
    /// # Errors
    ///
    /// [`SamplifyError::Validation`] naming the offending argument.
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::UpdateProject { ext_project_id, .. }
            | Self::BuyProject { ext_project_id, .. }
            | Self::CloseProject { ext_project_id }
            | Self::GetProject { ext_project_id }
            | Self::GetProjectReport { ext_project_id }
            | Self::GetDetailedProjectReport { ext_project_id }
            | Self::GetInvoice { ext_project_id }
            | Self::GetFeasibility { ext_project_id, .. }
            | Self::GetProjectPermissions { ext_project_id }
            | Self::UpsertProjectPermissions { ext_project_id, .. }
            | Self::ListLineItems { ext_project_id, .. } => {
                require_non_empty("extProjectId", ext_project_id)
            }
            Self::UploadReconcile { ext_project_id, file_name, .. } => {
                require_non_empty("extProjectId", ext_project_id)?;
                require_non_empty("fileName", file_name)
            }
            Self::AddLineItem { ext_project_id, line_item } => {
                require_non_empty("extProjectId", ext_project_id)?;
                validate_field_schedule(line_item)
            }
            Self::UpdateLineItem { ext_project_id, ext_line_item_id, line_item } => {
                require_non_empty("extProjectId", ext_project_id)?;
                require_non_empty("extLineItemId", ext_line_item_id)?;
                validate_field_schedule(line_item)
            }
            Self::UpdateLineItemState { ext_project_id, ext_line_item_id, .. }
            | Self::GetLineItem { ext_project_id, ext_line_item_id }
            | Self::GetDetailedLineItemReport { ext_project_id, ext_line_item_id } => {
                require_non_empty("extProjectId", ext_project_id)?;
                require_non_empty("extLineItemId", ext_line_item_id)
            }
            Self::SetQuotaCellStatus { ext_project_id, ext_line_item_id, quota_cell_id, .. } => {
                require_non_empty("extProjectId", ext_project_id)?;
                require_non_empty("extLineItemId", ext_line_item_id)?;
                require_non_empty("quotaCellId", quota_cell_id)
            }
            Self::GetAttributes { country_code, language_code, .. }
            | Self::ListTemplates { country_code, language_code, .. } => {
                require_non_empty("countryCode", country_code)?;
                require_non_empty("languageCode", language_code)
            }
            Self::GetEvent { event_id } => require_non_empty("eventId", event_id),
            Self::AcceptEvent { accept_url } => require_non_empty("event accept URL", accept_url),
            Self::RejectEvent { reject_url } => require_non_empty("event reject URL", reject_url),
            Self::UpdateTemplate { id, .. } | Self::DeleteTemplate { id } => {
                require_non_zero("template id", *id)
            }
            Self::GetInvoicesSummary { .. }
            | Self::CreateProject { .. }
            | Self::ListProjects { .. }
            | Self::GetCountries { .. }
            | Self::GetSurveyTopics { .. }
            | Self::GetSources { .. }
            | Self::ListEvents { .. }
            | Self::GetUserInfo
            | Self::GetCompanyUsers
            | Self::GetTeams
            | Self::GetRoles { .. }
            | Self::GetStudyMetadata
            | Self::CreateTemplate { .. }
            | Self::HealthCheck => Ok(()),
        }
    }

    /// Validate and lower into method, target, path and encoded body.
    ///
    /// # Errors
    ///
    /// [`SamplifyError::Validation`] from [`Operation::validate`], or
    /// [`SamplifyError::Serialization`] when the body cannot be encoded.
    pub fn into_request(self) -> Result<RequestSpec> {
        use HttpMethod::{Delete, Get, Post};

        self.validate()?;

        let api = |method, path: String, body: RequestBody| RequestSpec {
            method,
            target: Target::Endpoint(Endpoint::Api),
            path,
            body,
        };
        let json = |value: &Value| RequestBody::json(Some(value));
        let q = |query: &Option<QueryOptions>| render_query(query.as_ref());

        let spec = match self {
            Self::GetInvoicesSummary { query } => {
                api(Get, format!("/projects/invoices/summary{}", q(&query)), RequestBody::Empty)
            }
            Self::CreateProject { project } => api(Post, "/projects".into(), json(&project)?),
            Self::UpdateProject { ext_project_id, project } => {
                api(Post, format!("/projects/{ext_project_id}"), json(&project)?)
            }
            Self::BuyProject { ext_project_id, buy } => {
                api(Post, format!("/projects/{ext_project_id}/buy"), json(&buy)?)
            }
            Self::CloseProject { ext_project_id } => {
                api(Post, format!("/projects/{ext_project_id}/close"), RequestBody::Empty)
            }
            Self::ListProjects { query } => {
                api(Get, format!("/projects{}", q(&query)), RequestBody::Empty)
            }
            Self::GetProject { ext_project_id } => {
                api(Get, format!("/projects/{ext_project_id}"), RequestBody::Empty)
            }
            Self::GetProjectReport { ext_project_id } => {
                api(Get, format!("/projects/{ext_project_id}/report"), RequestBody::Empty)
            }
            Self::GetDetailedProjectReport { ext_project_id } => {
                api(Get, format!("/projects/{ext_project_id}/detailedReport"), RequestBody::Empty)
            }
            Self::GetInvoice { ext_project_id } => {
                api(Get, format!("/projects/{ext_project_id}/invoices"), RequestBody::Empty)
            }
            Self::GetFeasibility { ext_project_id, query } => api(
                Get,
                format!("/projects/{ext_project_id}/feasibility{}", q(&query)),
                RequestBody::Empty,
            ),
            Self::UploadReconcile { ext_project_id, file_name, file, message } => api(
                Post,
                format!("/projects/{ext_project_id}/reconcile"),
                RequestBody::Multipart(MultipartForm {
                    file_field: MULTIPART_FILE_FIELD.to_string(),
                    file_name,
                    file,
                    fields: vec![(MULTIPART_MESSAGE_FIELD.to_string(), message)],
                }),
            ),
            Self::GetProjectPermissions { ext_project_id } => {
                api(Get, format!("/projects/{ext_project_id}/permissions"), RequestBody::Empty)
            }
            Self::UpsertProjectPermissions { ext_project_id, permissions } => {
                api(Post, format!("/projects/{ext_project_id}/permissions"), json(&permissions)?)
            }
            Self::AddLineItem { ext_project_id, line_item } => {
                api(Post, format!("/projects/{ext_project_id}/lineItems"), json(&line_item)?)
            }
            Self::UpdateLineItem { ext_project_id, ext_line_item_id, line_item } => api(
                Post,
                format!("/projects/{ext_project_id}/lineItems/{ext_line_item_id}"),
                json(&line_item)?,
            ),
            Self::UpdateLineItemState { ext_project_id, ext_line_item_id, action } => api(
                Post,
                format!("/projects/{ext_project_id}/lineItems/{ext_line_item_id}/{action}"),
                RequestBody::Empty,
            ),
            Self::SetQuotaCellStatus { ext_project_id, ext_line_item_id, quota_cell_id, action } => {
                api(
                    Post,
                    format!(
                        "/projects/{ext_project_id}/lineItems/{ext_line_item_id}/quotaCells/{quota_cell_id}/{action}"
                    ),
                    RequestBody::Empty,
                )
            }
            Self::ListLineItems { ext_project_id, query } => api(
                Get,
                format!("/projects/{ext_project_id}/lineItems{}", q(&query)),
                RequestBody::Empty,
            ),
            Self::GetLineItem { ext_project_id, ext_line_item_id } => api(
                Get,
                format!("/projects/{ext_project_id}/lineItems/{ext_line_item_id}"),
                RequestBody::Empty,
            ),
            Self::GetDetailedLineItemReport { ext_project_id, ext_line_item_id } => api(
                Get,
                format!("/projects/{ext_project_id}/lineItems/{ext_line_item_id}/detailedReport"),
                RequestBody::Empty,
            ),
            Self::GetCountries { query } => {
                api(Get, format!("/countries{}", q(&query)), RequestBody::Empty)
            }
            Self::GetAttributes { country_code, language_code, query } => api(
                Get,
                format!("/attributes/{country_code}/{language_code}{}", q(&query)),
                RequestBody::Empty,
            ),
            Self::GetSurveyTopics { query } => {
                api(Get, format!("/categories/surveyTopics{}", q(&query)), RequestBody::Empty)
            }
            Self::GetSources { query } => {
                api(Get, format!("/sources{}", q(&query)), RequestBody::Empty)
            }
            Self::ListEvents { query } => {
                api(Get, format!("/events{}", q(&query)), RequestBody::Empty)
            }
            Self::GetEvent { event_id } => {
                api(Get, format!("/events/{event_id}"), RequestBody::Empty)
            }
            Self::AcceptEvent { accept_url: url } | Self::RejectEvent { reject_url: url } => {
                RequestSpec {
                    method: Post,
                    target: Target::Absolute(url),
                    path: String::new(),
                    body: RequestBody::Empty,
                }
            }
            Self::GetUserInfo => api(Get, "/users/info".into(), RequestBody::Empty),
            Self::GetCompanyUsers => api(Get, "/users".into(), RequestBody::Empty),
            Self::GetTeams => api(Get, "/teams".into(), RequestBody::Empty),
            Self::GetRoles { query } => api(Get, format!("/roles{}", q(&query)), RequestBody::Empty),
            Self::GetStudyMetadata => api(Get, "/studyMetadata".into(), RequestBody::Empty),
            Self::CreateTemplate { template } => {
                api(Post, "/templates/quotaPlan".into(), json(&template)?)
            }
            Self::UpdateTemplate { id, template } => {
                api(Post, format!("/templates/quotaPlan/{id}"), json(&template)?)
            }
            Self::ListTemplates { country_code, language_code, query } => api(
                Get,
                format!("/templates/quotaPlan/{country_code}/{language_code}{}", q(&query)),
                RequestBody::Empty,
            ),
            Self::DeleteTemplate { id } => {
                api(Delete, format!("/templates/quotaPlan/{id}"), RequestBody::Empty)
            }
            Self::HealthCheck => RequestSpec {
                method: Get,
                target: Target::Endpoint(Endpoint::Gateway),
                path: String::new(),
                body: RequestBody::Empty,
            },
        };
        Ok(spec)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::types::query::SortOrder;

    fn request(op: Operation) -> RequestSpec {
        op.into_request().unwrap()
    }

    #[test]
    fn list_projects_carries_query_string() {
        let spec = request(Operation::ListProjects {
            query: Some(QueryOptions::new().sort_by("createdAt", SortOrder::Desc).limit(5)),
        });
        assert_eq!(spec.method, HttpMethod::Get);
        assert_eq!(spec.target, Target::Endpoint(Endpoint::Api));
        assert_eq!(spec.path, "/projects?sort=createdAt%3Adesc&limit=5");
        assert_eq!(spec.body, RequestBody::Empty);
    }

    #[test]
    fn line_item_state_change_uses_action_suffix() {
        let spec = request(Operation::UpdateLineItemState {
            ext_project_id: "p1".into(),
            ext_line_item_id: "l1".into(),
            action: LineItemAction::Close,
        });
        assert_eq!(spec.method, HttpMethod::Post);
        assert_eq!(spec.path, "/projects/p1/lineItems/l1/close");
    }

    #[test]
    fn quota_cells_cannot_be_closed() {
        assert!(QuotaCellAction::try_from(LineItemAction::Close).is_err());
        assert_eq!("pause".parse::<QuotaCellAction>().unwrap(), QuotaCellAction::Pause);
        assert!("close".parse::<QuotaCellAction>().is_err());

        let spec = request(Operation::SetQuotaCellStatus {
            ext_project_id: "p1".into(),
            ext_line_item_id: "l1".into(),
            quota_cell_id: "7".into(),
            action: QuotaCellAction::Launch,
        });
        assert_eq!(spec.path, "/projects/p1/lineItems/l1/quotaCells/7/launch");
    }

    #[test]
    fn blank_project_id_fails_before_request_is_built() {
        let err = Operation::GetProject { ext_project_id: " ".into() }.into_request().unwrap_err();
        assert!(matches!(err, SamplifyError::Validation(_)));
    }

    #[test]
    fn event_actions_target_the_server_provided_url() {
        let spec = request(Operation::AcceptEvent {
            accept_url: "https://api.example.com/sample/v1/events/9/accept".into(),
        });
        assert_eq!(
            spec.target,
            Target::Absolute("https://api.example.com/sample/v1/events/9/accept".into())
        );
        assert!(spec.path.is_empty());

        let err = Operation::RejectEvent { reject_url: String::new() }.into_request().unwrap_err();
        assert!(matches!(err, SamplifyError::Validation(_)));
    }

    #[test]
    fn template_ids_must_be_non_zero() {
        assert!(Operation::DeleteTemplate { id: 0 }.validate().is_err());
        let spec = request(Operation::DeleteTemplate { id: 12 });
        assert_eq!(spec.method, HttpMethod::Delete);
        assert_eq!(spec.path, "/templates/quotaPlan/12");
    }

    #[test]
    fn line_item_schedule_is_checked() {
        let op = Operation::AddLineItem {
            ext_project_id: "p1".into(),
            line_item: json!({"fieldSchedule": {
                "startDate": "2024-05-02T00:00:00Z",
                "endDate": "2024-05-01T00:00:00Z"
            }}),
        };
        assert!(matches!(op.into_request(), Err(SamplifyError::Validation(_))));
    }

    #[test]
    fn json_bodies_are_encoded_up_front() {
        let spec = request(Operation::CreateProject { project: json!({"extProjectId": "p1"}) });
        assert_eq!(spec.body, RequestBody::Json(br#"{"extProjectId":"p1"}"#.to_vec()));
    }

    #[test]
    fn reconcile_upload_is_multipart() {
        let spec = request(Operation::UploadReconcile {
            ext_project_id: "p1".into(),
            file_name: "ids.xlsx".into(),
            file: vec![1, 2, 3],
            message: "corrections".into(),
        });
        let RequestBody::Multipart(form) = spec.body else {
            panic!("expected multipart body");
        };
        assert_eq!(form.file_field, "file");
        assert_eq!(form.file_name, "ids.xlsx");
        assert_eq!(form.fields, vec![("message".to_string(), "corrections".to_string())]);

        let err = Operation::UploadReconcile {
            ext_project_id: "p1".into(),
            file_name: String::new(),
            file: Vec::new(),
            message: String::new(),
        }
        .validate()
        .unwrap_err();
        assert!(matches!(err, SamplifyError::Validation(_)));
    }

    #[test]
    fn health_check_hits_gateway_root() {
        let spec = request(Operation::HealthCheck);
        assert_eq!(spec.target, Target::Endpoint(Endpoint::Gateway));
        assert_eq!(spec.path, "");
    }
}
