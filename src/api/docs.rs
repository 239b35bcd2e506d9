//! API documentation endpoints.
//!
//! - `/openapi.json`: OpenAPI document generated from the mounted routes
//!   (`utoipa-axum` collects one entry per annotated handler)
//! - `/docs`, `/redoc`: Swagger UI and ReDoc rendering that document
//!
//! Tags, the bearer requirement and the 401 response of each route group are
//! applied here from `GroupSpec`, so injected group routers are documented
//! with the same policy the router enforces.

use axum::Router;
use utoipa::{
    Modify, OpenApi,
    openapi::{
        self, Content, Ref, RefOr, ResponseBuilder,
        path::{Operation, PathItem},
        security::{Http, HttpAuthScheme, SecurityRequirement, SecurityScheme},
        tag::TagBuilder,
    },
};
use utoipa_redoc::{Redoc, Servable};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::v1::groups::{self, GroupSpec};
use crate::api::{SERVICE_DESCRIPTION, SERVICE_NAME, SERVICE_VERSION};
use crate::error::{ErrorResponse, UNAUTHORIZED_MESSAGE};
use crate::state::AppState;

pub const DOCS_PATH: &str = "/docs";
pub const REDOC_PATH: &str = "/redoc";
pub const OPENAPI_PATH: &str = "/openapi.json";

const BEARER_SCHEME: &str = "HTTPBearer";

#[derive(OpenApi)]
#[openapi(modifiers(&BearerScheme), components(schemas(ErrorResponse)))]
pub struct ApiDoc;

struct BearerScheme;

impl Modify for BearerScheme {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            BEARER_SCHEME,
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}

/// Base document: service info and the bearer scheme, no paths yet.
pub fn base_document() -> openapi::OpenApi {
    let mut doc = ApiDoc::openapi();
    doc.info.title = SERVICE_NAME.to_string();
    doc.info.description = Some(SERVICE_DESCRIPTION.to_string());
    doc.info.version = SERVICE_VERSION.to_string();
    doc
}

/// Tag every path with its group and mark protected groups as bearer-only.
pub fn apply_group_policy(mut doc: openapi::OpenApi) -> openapi::OpenApi {
    for (path, item) in doc.paths.paths.iter_mut() {
        let Some(spec) = groups::ALL.iter().find(|spec| spec.covers(path)) else {
            continue;
        };
        for operation in operations_mut(item) {
            document_operation(operation, spec);
        }
    }

    doc.tags = Some(
        groups::ALL
            .iter()
            .map(|spec| TagBuilder::new().name(spec.tag).build())
            .collect(),
    );
    doc
}

fn operations_mut(item: &mut PathItem) -> impl Iterator<Item = &mut Operation> {
    [
        &mut item.get,
        &mut item.put,
        &mut item.post,
        &mut item.delete,
        &mut item.options,
        &mut item.head,
        &mut item.patch,
        &mut item.trace,
    ]
    .into_iter()
    .flatten()
}

fn document_operation(operation: &mut Operation, spec: &GroupSpec) {
    operation.tags = Some(vec![spec.tag.to_string()]);
    if !spec.protected {
        return;
    }

    operation.security = Some(vec![SecurityRequirement::new(
        BEARER_SCHEME,
        Vec::<String>::new(),
    )]);

    let unauthorized = ResponseBuilder::new()
        .description(UNAUTHORIZED_MESSAGE)
        .content(
            "application/json",
            Content::new(Some(Ref::from_schema_name("ErrorResponse"))),
        )
        .build();
    operation
        .responses
        .responses
        .insert("401".to_string(), RefOr::T(unauthorized));
}

/// `/docs`, `/redoc` and `/openapi.json`, serving `doc`.
pub fn routes(doc: openapi::OpenApi) -> Router<AppState> {
    Router::new()
        .merge(SwaggerUi::new(DOCS_PATH).url(OPENAPI_PATH, doc.clone()))
        .merge(Redoc::with_url(REDOC_PATH, doc))
}
