//! 预算 CRUD 与提醒端点

use actix_web::{HttpResponse, Result as ActixResult, web};
use std::sync::Arc;

use crate::api::middleware::AuthenticatedUser;
use crate::services::{BudgetService, CreateBudgetRequest, UpdateBudgetRequest};
use crate::storage::SeaOrmStorage;

use super::error_code::ErrorScope;
use super::helpers::{api_result, created_response, message_response, success_response};
use super::types::{AlertsResponse, BudgetListResponse, BudgetResponse};

const SCOPE: ErrorScope = ErrorScope::Budget;

fn service(storage: &web::Data<Arc<SeaOrmStorage>>) -> BudgetService {
    BudgetService::new(storage.get_ref().clone())
}

/// GET /budgets
pub async fn list_budgets(
    user: AuthenticatedUser,
    storage: web::Data<Arc<SeaOrmStorage>>,
) -> ActixResult<HttpResponse> {
    let result = service(&storage).list(&user.user_id).await;

    Ok(api_result(result, SCOPE, |budgets| {
        success_response(BudgetListResponse {
            budgets: budgets.into_iter().map(Into::into).collect(),
        })
    }))
}

/// POST /budgets
pub async fn create_budget(
    user: AuthenticatedUser,
    body: web::Json<CreateBudgetRequest>,
    storage: web::Data<Arc<SeaOrmStorage>>,
) -> ActixResult<HttpResponse> {
    let result = service(&storage)
        .create(&user.user_id, body.into_inner())
        .await;

    Ok(api_result(result, SCOPE, |b| {
        created_response(BudgetResponse { budget: b.into() })
    }))
}

/// GET /budgets/{id}
pub async fn get_budget(
    user: AuthenticatedUser,
    path: web::Path<String>,
    storage: web::Data<Arc<SeaOrmStorage>>,
) -> ActixResult<HttpResponse> {
    let result = service(&storage).get(&user.user_id, &path).await;

    Ok(api_result(result, SCOPE, |b| {
        success_response(BudgetResponse { budget: b.into() })
    }))
}

/// PUT /budgets/{id}
pub async fn update_budget(
    user: AuthenticatedUser,
    path: web::Path<String>,
    body: web::Json<UpdateBudgetRequest>,
    storage: web::Data<Arc<SeaOrmStorage>>,
) -> ActixResult<HttpResponse> {
    let result = service(&storage)
        .update(&user.user_id, &path, body.into_inner())
        .await;

    Ok(api_result(result, SCOPE, |b| {
        success_response(BudgetResponse { budget: b.into() })
    }))
}

/// DELETE /budgets/{id}
pub async fn delete_budget(
    user: AuthenticatedUser,
    path: web::Path<String>,
    storage: web::Data<Arc<SeaOrmStorage>>,
) -> ActixResult<HttpResponse> {
    let result = service(&storage).delete(&user.user_id, &path).await;

    Ok(api_result(result, SCOPE, |_| {
        message_response("Budget deleted successfully")
    }))
}

/// GET /budgets/alerts/check
pub async fn check_alerts(
    user: AuthenticatedUser,
    storage: web::Data<Arc<SeaOrmStorage>>,
) -> ActixResult<HttpResponse> {
    let result = service(&storage).check_alerts(&user.user_id).await;

    Ok(api_result(result, SCOPE, |alerts| {
        success_response(AlertsResponse { alerts })
    }))
}
