/*
 * Responsibility
 * - v1 の URL 構造を定義
 * - /info と各ルートグループを nest (OpenAPI の path もここで組み上がる)
 * - 認証の範囲は app::build_router が groups::protected_prefixes() から決める
 */
use utoipa_axum::{router::OpenApiRouter, routes};

use crate::api::v1::groups::RouteGroups;
use crate::api::v1::handlers::info;
use crate::state::AppState;

pub fn routes(groups: RouteGroups) -> OpenApiRouter<AppState> {
    let mut router = OpenApiRouter::new().routes(routes!(info::system_info));

    for (spec, group) in groups.into_parts() {
        router = router.nest(spec.prefix, group);
    }

    router
}
