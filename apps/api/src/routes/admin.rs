//! Admin reporting.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use folio_core::SalesReport;

use crate::auth::Caller;
use crate::error::ApiResult;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct SalesReportResponse {
    pub message: &'static str,
    pub data: SalesReport,
}

pub async fn sales_report(
    State(state): State<Arc<AppState>>,
    Caller(identity): Caller,
) -> ApiResult<Json<SalesReportResponse>> {
    let report = state.shop.reports.get_report(Some(&identity)).await?;
    Ok(Json(SalesReportResponse {
        message: "Financial report generated successfully",
        data: report,
    }))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use folio_core::Identity;
    use serde_json::json;

    use crate::routes::test_support::{app, json, send};

    #[tokio::test]
    async fn test_admin_gets_report() {
        let app = app().await;
        let alice = Identity::member("alice");
        send(&app.router, "POST", "/api/cart/add", Some(&alice), Some(json!({"bookId": "B1", "quantity": 3}))).await;
        send(&app.router, "POST", "/api/orders/checkout", Some(&alice), None).await;

        let response = send(&app.router, "GET", "/api/admin/sales", Some(&Identity::admin("root")), None).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = json(response).await;
        assert_eq!(body["message"], "Financial report generated successfully");
        assert_eq!(body["data"]["totalRevenueCents"], 3000);
        assert_eq!(body["data"]["numberOfOrders"], 1);
    }

    #[tokio::test]
    async fn test_member_is_forbidden() {
        let app = app().await;
        let response = send(&app.router, "GET", "/api/admin/sales", Some(&Identity::member("alice")), None).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(json(response).await["code"], "UNAUTHORIZED");
    }

    #[tokio::test]
    async fn test_anonymous_is_unauthenticated() {
        let app = app().await;
        let response = send(&app.router, "GET", "/api/admin/sales", None, None).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
