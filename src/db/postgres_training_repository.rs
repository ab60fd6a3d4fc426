use async_trait::async_trait;
use sqlx::{PgConnection, PgPool, Postgres};
use uuid::Uuid;

use crate::db::training_repository::{
    FailureOutcome, RepositoryError, StatusTransition, TrainingRepository,
};
use crate::models::training_model::{ModelRecord, ModelStatus};

const MODEL_COLUMNS: &str = r#"id, "modelId" AS model_id, user_id, status, created_at"#;

pub struct PostgresTrainingRepository {
    pub pool: PgPool,
}

async fn select_model(
    conn: &mut PgConnection,
    job_id: &str,
) -> Result<Option<ModelRecord>, sqlx::Error> {
    let sql = format!(
        r#"SELECT {} FROM models WHERE "modelId" = $1 ORDER BY id LIMIT 1"#,
        MODEL_COLUMNS
    );
    sqlx::query_as::<Postgres, ModelRecord>(&sql)
        .bind(job_id)
        .fetch_optional(conn)
        .await
}

async fn transition_model(
    conn: &mut PgConnection,
    job_id: &str,
    to: ModelStatus,
) -> Result<StatusTransition, sqlx::Error> {
    let update_sql = format!(
        r#"
        UPDATE models
        SET status = $1
        WHERE "modelId" = $2
          AND status NOT IN ('finished', 'failed')
        RETURNING {}
        "#,
        MODEL_COLUMNS
    );
    let updated = sqlx::query_as::<Postgres, ModelRecord>(&update_sql)
        .bind(to.as_str())
        .bind(job_id)
        .fetch_all(&mut *conn)
        .await?;

    if let Some(record) = updated.into_iter().next() {
        return Ok(StatusTransition::Applied(record));
    }

    Ok(match select_model(conn, job_id).await? {
        Some(record) => StatusTransition::AlreadyTerminal(record),
        None => StatusTransition::Missing,
    })
}

#[async_trait]
impl TrainingRepository for PostgresTrainingRepository {
    async fn find_model_by_job_id(
        &self,
        job_id: &str,
    ) -> Result<Option<ModelRecord>, RepositoryError> {
        let mut conn = self.pool.acquire().await?;
        Ok(select_model(&mut conn, job_id).await?)
    }

    async fn get_credit_balance(&self, user_id: Uuid) -> Result<i32, RepositoryError> {
        sqlx::query_scalar::<Postgres, i32>("SELECT credits FROM credits WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(RepositoryError::CreditsNotFound(user_id))
    }

    async fn mark_model_finished(&self, job_id: &str) -> Result<StatusTransition, RepositoryError> {
        let mut conn = self.pool.acquire().await?;
        let transition = transition_model(&mut conn, job_id, ModelStatus::Finished).await?;
        Ok(transition)
    }

    async fn mark_model_failed(
        &self,
        job_id: &str,
        user_id: Uuid,
        refund: bool,
    ) -> Result<FailureOutcome, RepositoryError> {
        let mut tx = self.pool.begin().await?;
        let transition = transition_model(&mut tx, job_id, ModelStatus::Failed).await?;

        let mut refunded_balance = None;
        if refund && !transition.is_already_terminal() {
            let conn: &mut PgConnection = &mut tx;
            let balance = sqlx::query_scalar::<Postgres, i32>(
                r#"
                UPDATE credits
                SET credits = credits + 1
                WHERE user_id = $1
                RETURNING credits
                "#,
            )
            .bind(user_id)
            .fetch_optional(conn)
            .await?;

            match balance {
                Some(credits) => refunded_balance = Some(credits),
                None => {
                    tx.rollback().await?;
                    return Err(RepositoryError::CreditsNotFound(user_id));
                }
            }
        }

        tx.commit().await?;
        Ok(FailureOutcome {
            transition,
            refunded_balance,
        })
    }
}
