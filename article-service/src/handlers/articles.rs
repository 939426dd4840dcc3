//! Article catalogue handlers.
//!
//! Every handler performs at most one store call and produces exactly one
//! response: validation failures return before the store is touched.

use crate::models::{Article, ArticleField, PriceUpdate};
use crate::startup::AppState;
use anyhow::anyhow;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde_json::Value;
use service_core::error::AppError;

const WELCOME: &str = "Bienvenido a la API del Supermercado";
const ARTICLE_NOT_FOUND: &str = "Artículo no encontrado";
const INVALID_PAYLOAD: &str = "Error en el formato de datos a crear.";

fn parse_codigo(raw: &str) -> Result<i64, AppError> {
    raw.trim().parse().map_err(|_| {
        AppError::BadRequest(anyhow!("Código de artículo inválido: {}", raw))
    })
}

pub async fn welcome() -> Json<&'static str> {
    Json(WELCOME)
}

pub async fn not_found() -> AppError {
    AppError::NotFound(anyhow!("Lo sentimos, la página que buscas no existe."))
}

pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed(anyhow!("Método no permitido para esta ruta."))
}

pub async fn list_articles(State(state): State<AppState>) -> Result<Json<Vec<Article>>, AppError> {
    let articles = state
        .store
        .list()
        .await
        .map_err(|e| e.into_app_error("Error al obtener los artículos de la base de datos"))?;

    Ok(Json(articles))
}

pub async fn get_article(
    State(state): State<AppState>,
    Path(codigo): Path<String>,
) -> Result<Json<Article>, AppError> {
    let codigo = parse_codigo(&codigo)?;

    let article = state
        .store
        .find_by_codigo(codigo)
        .await
        .map_err(|e| e.into_app_error("Error al obtener el artículo de la base de datos"))?
        .ok_or_else(|| AppError::NotFound(anyhow!(ARTICLE_NOT_FOUND)))?;

    Ok(Json(article))
}

pub async fn search_by_nombre(
    State(state): State<AppState>,
    Path(nombre): Path<String>,
) -> Result<Json<Vec<Article>>, AppError> {
    search(&state, ArticleField::Nombre, &nombre, ARTICLE_NOT_FOUND).await
}

pub async fn search_by_categoria(
    State(state): State<AppState>,
    Path(categoria): Path<String>,
) -> Result<Json<Vec<Article>>, AppError> {
    search(
        &state,
        ArticleField::Categoria,
        &categoria,
        "Artículos no encontrados",
    )
    .await
}

async fn search(
    state: &AppState,
    field: ArticleField,
    fragment: &str,
    not_found_message: &'static str,
) -> Result<Json<Vec<Article>>, AppError> {
    let articles = state
        .store
        .search(field, fragment)
        .await
        .map_err(|e| e.into_app_error("Error al obtener un artículo de la base de datos"))?;

    if articles.is_empty() {
        return Err(AppError::NotFound(anyhow!(not_found_message)));
    }

    Ok(Json(articles))
}

pub async fn create_article(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Article>), AppError> {
    let article = match payload {
        Ok(Json(value)) => Article::from_value(value),
        Err(rejection) => {
            tracing::debug!(error = %rejection, "Rejected article payload");
            None
        }
    }
    .ok_or_else(|| AppError::BadRequest(anyhow!(INVALID_PAYLOAD)))?;

    state
        .store
        .insert(&article)
        .await
        .map_err(|e| e.into_app_error("Error al intentar crear un nuevo Artículo"))?;

    tracing::info!(codigo = ?article.fields().get("codigo"), "Article created");

    Ok((StatusCode::CREATED, Json(article)))
}

pub async fn update_price(
    State(state): State<AppState>,
    Path(codigo): Path<String>,
    payload: Result<Json<PriceUpdate>, JsonRejection>,
) -> Result<Json<PriceUpdate>, AppError> {
    let codigo = parse_codigo(&codigo)?;
    let Json(update) = payload.map_err(|rejection| {
        tracing::debug!(error = %rejection, "Rejected price payload");
        AppError::BadRequest(anyhow!("Error en el formato de datos a modificar."))
    })?;

    let matched = state
        .store
        .update_precio(codigo, &update.precio)
        .await
        .map_err(|e| e.into_app_error("Error al modificar el Artículo"))?;

    if matched == 0 {
        return Err(AppError::NotFound(anyhow!(ARTICLE_NOT_FOUND)));
    }

    tracing::info!(codigo, precio = %update.precio, "Article price updated");

    Ok(Json(update))
}

pub async fn delete_article(
    State(state): State<AppState>,
    Path(codigo): Path<String>,
) -> Result<StatusCode, AppError> {
    let codigo = parse_codigo(&codigo)?;

    let deleted = state
        .store
        .delete(codigo)
        .await
        .map_err(|e| e.into_app_error("Error al eliminar el Artículo"))?;

    if deleted == 0 {
        return Err(AppError::NotFound(anyhow!(
            "No se encontró ningún artículo con el código seleccionado."
        )));
    }

    tracing::info!(codigo, "Article deleted");

    Ok(StatusCode::NO_CONTENT)
}
