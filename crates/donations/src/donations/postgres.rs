use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::PgPool;
use tracing::info;

use crate::config::DatabaseConfig;

use super::domain::{
    CreateDonationRequest, Donation, DonationId, DonationStatus, DonationType,
};
use super::normalize::normalize_interval;
use super::repository::{DonationRepository, RepositoryError};

const DONATION_COLUMNS: &str = "id, first_name, last_name, email, amount, is_anonymous, \
     donation_type, recurring_interval, dedication_message, show_dedication_publicly, \
     status, created_at, updated_at, transaction_id";

/// PostgreSQL-backed donation store.
#[derive(Clone)]
pub struct PgDonationRepository {
    pool: PgPool,
}

impl PgDonationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(config: &DatabaseConfig) -> Result<Self, sqlx::Error> {
        let options = PgConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .username(&config.username)
            .password(&config.password)
            .database(&config.database);

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(options)
            .await?;

        info!(
            host = %config.host,
            database = %config.database,
            "database connection established"
        );
        Ok(Self::new(pool))
    }

    /// Apply the embedded schema migrations.
    pub async fn migrate(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        info!("database migrations applied");
        Ok(())
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl DonationRepository for PgDonationRepository {
    async fn insert(&self, request: CreateDonationRequest) -> Result<Donation, RepositoryError> {
        let sql = format!(
            "INSERT INTO donations (first_name, last_name, email, amount, is_anonymous, \
             donation_type, recurring_interval, dedication_message, show_dedication_publicly, \
             status, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, now(), now()) \
             RETURNING {DONATION_COLUMNS}"
        );

        let row: DonationRow = sqlx::query_as(&sql)
            .bind(&request.first_name)
            .bind(&request.last_name)
            .bind(&request.email)
            .bind(request.amount)
            .bind(request.is_anonymous)
            .bind(request.donation_type.code())
            .bind(request.recurring_interval.map(|interval| interval.label()))
            .bind(&request.dedication_message)
            .bind(request.show_dedication_publicly)
            .bind(DonationStatus::Pending.label())
            .fetch_one(&self.pool)
            .await?;

        Donation::try_from(row)
    }

    async fn fetch(&self, id: DonationId) -> Result<Option<Donation>, RepositoryError> {
        let sql = format!("SELECT {DONATION_COLUMNS} FROM donations WHERE id = $1");
        let row: Option<DonationRow> = sqlx::query_as(&sql)
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Donation::try_from).transpose()
    }

    async fn list(&self, limit: usize) -> Result<Vec<Donation>, RepositoryError> {
        let sql = format!(
            "SELECT {DONATION_COLUMNS} FROM donations ORDER BY created_at DESC, id DESC LIMIT $1"
        );
        let rows: Vec<DonationRow> = sqlx::query_as(&sql)
            .bind(i64::try_from(limit).unwrap_or(i64::MAX))
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(Donation::try_from).collect()
    }
}

#[derive(Debug, sqlx::FromRow)]
struct DonationRow {
    id: i32,
    first_name: String,
    last_name: String,
    email: String,
    amount: Decimal,
    is_anonymous: bool,
    donation_type: i32,
    recurring_interval: Option<String>,
    dedication_message: Option<String>,
    show_dedication_publicly: bool,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    transaction_id: Option<String>,
}

impl TryFrom<DonationRow> for Donation {
    type Error = RepositoryError;

    fn try_from(row: DonationRow) -> Result<Self, Self::Error> {
        let donation_type = DonationType::from_code(row.donation_type).ok_or_else(|| {
            RepositoryError::Corrupt(format!(
                "donation {} has unknown donation_type {}",
                row.id, row.donation_type
            ))
        })?;
        let status = row
            .status
            .parse::<DonationStatus>()
            .map_err(|err| RepositoryError::Corrupt(format!("donation {}: {err}", row.id)))?;

        Ok(Donation {
            id: DonationId(row.id),
            first_name: row.first_name,
            last_name: row.last_name,
            email: row.email,
            amount: row.amount,
            is_anonymous: row.is_anonymous,
            donation_type,
            // Rows written before the interval constraint may hold free-form text.
            recurring_interval: normalize_interval(row.recurring_interval.as_deref()),
            dedication_message: row.dedication_message,
            show_dedication_publicly: row.show_dedication_publicly,
            status,
            created_at: row.created_at,
            updated_at: row.updated_at,
            transaction_id: row.transaction_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::donations::domain::RecurringInterval;
    use chrono::TimeZone;

    fn row() -> DonationRow {
        let created = Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap();
        DonationRow {
            id: 9,
            first_name: "John".to_string(),
            last_name: "Smith".to_string(),
            email: "john.smith@example.com".to_string(),
            amount: Decimal::new(10000, 2),
            is_anonymous: false,
            donation_type: 1,
            recurring_interval: Some(" Monthly".to_string()),
            dedication_message: None,
            show_dedication_publicly: false,
            status: "completed".to_string(),
            created_at: created,
            updated_at: created,
            transaction_id: Some("txn_1234567890".to_string()),
        }
    }

    #[test]
    fn decodes_rows_into_donations() {
        let donation = Donation::try_from(row()).expect("row decodes");
        assert_eq!(donation.id, DonationId(9));
        assert_eq!(donation.donation_type, DonationType::Recurring);
        assert_eq!(donation.recurring_interval, Some(RecurringInterval::Monthly));
        assert_eq!(donation.status, DonationStatus::Completed);
        assert_eq!(donation.transaction_id.as_deref(), Some("txn_1234567890"));
    }

    #[test]
    fn unknown_interval_text_is_dropped() {
        let mut row = row();
        row.recurring_interval = Some("fortnightly".to_string());
        let donation = Donation::try_from(row).expect("row decodes");
        assert_eq!(donation.recurring_interval, None);
    }

    #[test]
    fn rejects_out_of_range_tokens() {
        let mut bad_type = row();
        bad_type.donation_type = 4;
        assert!(matches!(
            Donation::try_from(bad_type),
            Err(RepositoryError::Corrupt(_))
        ));

        let mut bad_status = row();
        bad_status.status = "refunded".to_string();
        assert!(matches!(
            Donation::try_from(bad_status),
            Err(RepositoryError::Corrupt(_))
        ));
    }

    #[test]
    fn schema_constraints_cover_every_token() {
        let intervals = include_str!(
            "../../migrations/20251013000000_constrain_recurring_interval.sql"
        );
        for interval in RecurringInterval::ALL {
            assert!(intervals.contains(&format!("'{}'", interval.label())));
        }

        let payment = include_str!("../../migrations/20251006000000_add_donation_payment_columns.sql");
        for status in DonationStatus::ALL {
            assert!(payment.contains(&format!("'{}'", status.label())));
        }
    }
}
