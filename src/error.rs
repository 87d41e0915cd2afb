use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Domain error for every operation the API exposes.
///
/// Each variant maps to exactly one HTTP status; a failure is never
/// downgraded to a different kind on its way out.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Unauthenticated(String),

    #[error("No tienes permisos para realizar esta acción")]
    Forbidden,

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Validation(String),

    /// External collaborator (object storage) failed or timed out.
    #[error("{0}")]
    Dependency(String),

    #[error("error de base de datos")]
    Database(#[from] sqlx::Error),

    #[error("error interno")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    /// Uniform 404 message used by every entity lookup: "<Kind> no encontrado".
    pub fn not_found(kind: &str) -> Self {
        Self::NotFound(format!("{kind} no encontrado"))
    }

    pub fn unauthenticated() -> Self {
        Self::Unauthenticated("No autenticado. Por favor, inicia sesión para continuar.".into())
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Dependency(_) => StatusCode::BAD_GATEWAY,
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        // Detail of infrastructure failures goes to the log, not the client.
        let message = match &self {
            Self::Database(e) => {
                error!(error = %e, "database error");
                "No se pudo completar la operación".to_string()
            }
            Self::Internal(e) => {
                error!(error = %e, "internal error");
                "No se pudo completar la operación".to_string()
            }
            other => other.to_string(),
        };
        (status, Json(json!({ "status": false, "message": message }))).into_response()
    }
}

/// True when the error is a Postgres unique-constraint violation. Used as a
/// backstop for check-then-insert paths that also hold a DB-level constraint.
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db) => db.code().as_deref() == Some("23505"),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping_is_consistent() {
        assert_eq!(
            ApiError::unauthenticated().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(ApiError::Forbidden.status(), StatusCode::FORBIDDEN);
        assert_eq!(ApiError::not_found("Post").status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::Conflict("ya existe".into()).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::Validation("campo".into()).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ApiError::Dependency("almacenamiento".into()).status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            ApiError::Database(sqlx::Error::PoolClosed).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn not_found_message_is_uniform() {
        assert_eq!(
            ApiError::not_found("Usuario").to_string(),
            "Usuario no encontrado"
        );
        assert_eq!(ApiError::not_found("Gato").to_string(), "Gato no encontrado");
    }

    #[test]
    fn database_detail_is_not_leaked() {
        let resp = ApiError::Database(sqlx::Error::PoolClosed).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
