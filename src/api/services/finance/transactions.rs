//! 流水 CRUD 与统计端点

use actix_web::{HttpResponse, Result as ActixResult, web};
use chrono::Utc;
use std::sync::Arc;
use tracing::trace;

use crate::api::middleware::AuthenticatedUser;
use crate::services::{
    CreateTransactionRequest, StatsPeriod, TransactionQuery, TransactionService,
    UpdateTransactionRequest,
};
use crate::storage::SeaOrmStorage;

use super::error_code::ErrorScope;
use super::helpers::{api_result, created_response, message_response, success_response};
use super::types::{StatsQuery, TransactionListResponse, TransactionResponse};

const SCOPE: ErrorScope = ErrorScope::Transaction;

fn service(storage: &web::Data<Arc<SeaOrmStorage>>) -> TransactionService {
    TransactionService::new(storage.get_ref().clone())
}

/// GET /transactions
pub async fn list_transactions(
    user: AuthenticatedUser,
    query: web::Query<TransactionQuery>,
    storage: web::Data<Arc<SeaOrmStorage>>,
) -> ActixResult<HttpResponse> {
    trace!("list transactions: {:?}", query);
    let result = service(&storage)
        .list(&user.user_id, query.into_inner())
        .await;

    Ok(api_result(result, SCOPE, |page| {
        success_response(TransactionListResponse {
            transactions: page.transactions.into_iter().map(Into::into).collect(),
            pagination: page.pagination,
        })
    }))
}

/// POST /transactions
pub async fn create_transaction(
    user: AuthenticatedUser,
    body: web::Json<CreateTransactionRequest>,
    storage: web::Data<Arc<SeaOrmStorage>>,
) -> ActixResult<HttpResponse> {
    let result = service(&storage)
        .create(&user.user_id, body.into_inner())
        .await;

    Ok(api_result(result, SCOPE, |tx| {
        created_response(TransactionResponse {
            transaction: tx.into(),
        })
    }))
}

/// GET /transactions/{id}
pub async fn get_transaction(
    user: AuthenticatedUser,
    path: web::Path<String>,
    storage: web::Data<Arc<SeaOrmStorage>>,
) -> ActixResult<HttpResponse> {
    let result = service(&storage).get(&user.user_id, &path).await;

    Ok(api_result(result, SCOPE, |tx| {
        success_response(TransactionResponse {
            transaction: tx.into(),
        })
    }))
}

/// PUT /transactions/{id}
pub async fn update_transaction(
    user: AuthenticatedUser,
    path: web::Path<String>,
    body: web::Json<UpdateTransactionRequest>,
    storage: web::Data<Arc<SeaOrmStorage>>,
) -> ActixResult<HttpResponse> {
    let result = service(&storage)
        .update(&user.user_id, &path, body.into_inner())
        .await;

    Ok(api_result(result, SCOPE, |tx| {
        success_response(TransactionResponse {
            transaction: tx.into(),
        })
    }))
}

/// DELETE /transactions/{id}
pub async fn delete_transaction(
    user: AuthenticatedUser,
    path: web::Path<String>,
    storage: web::Data<Arc<SeaOrmStorage>>,
) -> ActixResult<HttpResponse> {
    let result = service(&storage).delete(&user.user_id, &path).await;

    Ok(api_result(result, SCOPE, |_| {
        message_response("Transaction deleted successfully")
    }))
}

/// GET /transactions/stats/summary?period=
pub async fn get_summary(
    user: AuthenticatedUser,
    query: web::Query<StatsQuery>,
    storage: web::Data<Arc<SeaOrmStorage>>,
) -> ActixResult<HttpResponse> {
    let period = StatsPeriod::parse(query.period.as_deref());
    let result = service(&storage)
        .summary(&user.user_id, period, Utc::now())
        .await;

    Ok(api_result(result, SCOPE, success_response))
}

/// GET /transactions/stats/categories?period=
pub async fn get_category_breakdown(
    user: AuthenticatedUser,
    query: web::Query<StatsQuery>,
    storage: web::Data<Arc<SeaOrmStorage>>,
) -> ActixResult<HttpResponse> {
    let period = StatsPeriod::parse(query.period.as_deref());
    let result = service(&storage)
        .category_breakdown(&user.user_id, period, Utc::now())
        .await;

    Ok(api_result(result, SCOPE, success_response))
}

/// GET /transactions/trends?range=
pub async fn get_trends(
    user: AuthenticatedUser,
    query: web::Query<StatsQuery>,
    storage: web::Data<Arc<SeaOrmStorage>>,
) -> ActixResult<HttpResponse> {
    let range = StatsPeriod::parse(query.range.as_deref());
    let result = service(&storage)
        .trends(&user.user_id, range, Utc::now())
        .await;

    Ok(api_result(result, SCOPE, success_response))
}
