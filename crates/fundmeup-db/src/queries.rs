use crate::Database;
use crate::models::{AccountRow, BackingRow, CampaignRow, ProfileRow, UpdateRow};
use anyhow::Result;
use rusqlite::{Connection, Row, params};

impl Database {
    // -- Accounts --

    pub fn create_account(
        &self,
        id: &str,
        email: &str,
        password_hash: &str,
        full_name: &str,
        role: &str,
    ) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO accounts (id, email, password, full_name, role) VALUES (?1, ?2, ?3, ?4, ?5)",
                params![id, email, password_hash, full_name, role],
            )?;
            Ok(())
        })
    }

    pub fn get_account_by_email(&self, email: &str) -> Result<Option<AccountRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, email, password, full_name, role, created_at
                 FROM accounts WHERE email = ?1",
            )?;
            stmt.query_row([email], account_from_row).optional()
        })
    }

    pub fn get_account_by_id(&self, id: &str) -> Result<Option<AccountRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, email, password, full_name, role, created_at
                 FROM accounts WHERE id = ?1",
            )?;
            stmt.query_row([id], account_from_row).optional()
        })
    }

    // -- Campaigns --

    /// New campaigns start at current_amount = 0, status = 'active'
    /// (column defaults).
    pub fn insert_campaign(
        &self,
        id: &str,
        title: &str,
        description: &str,
        category: &str,
        goal_amount: f64,
        image_url: &str,
        end_date: &str,
        creator_id: &str,
    ) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO campaigns (id, title, description, category, goal_amount, image_url, end_date, creator_id)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![id, title, description, category, goal_amount, image_url, end_date, creator_id],
            )?;
            Ok(())
        })
    }

    pub fn get_campaign(&self, id: &str) -> Result<Option<CampaignRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!("{} WHERE id = ?1", CAMPAIGN_SELECT))?;
            stmt.query_row([id], campaign_from_row).optional()
        })
    }

    pub fn list_campaigns(&self) -> Result<Vec<CampaignRow>> {
        self.with_conn(|conn| {
            collect_campaigns(conn, &format!("{} ORDER BY created_at", CAMPAIGN_SELECT), &[])
        })
    }

    /// Case-insensitive substring match on title or description, conjoined
    /// with an exact category filter. Either filter may be absent.
    pub fn search_campaigns(
        &self,
        text: Option<&str>,
        category: Option<&str>,
    ) -> Result<Vec<CampaignRow>> {
        self.with_conn(|conn| {
            let mut sql = format!("{} WHERE 1=1", CAMPAIGN_SELECT);
            let mut params: Vec<Box<dyn rusqlite::types::ToSql>> = Vec::new();

            if let Some(text) = text {
                params.push(Box::new(format!("%{}%", text.to_lowercase())));
                sql.push_str(&format!(
                    " AND (LOWER(title) LIKE ?{n} OR LOWER(description) LIKE ?{n})",
                    n = params.len()
                ));
            }
            if let Some(category) = category {
                params.push(Box::new(category.to_string()));
                sql.push_str(&format!(" AND category = ?{}", params.len()));
            }
            sql.push_str(" ORDER BY created_at");

            let param_refs: Vec<&dyn rusqlite::types::ToSql> =
                params.iter().map(|p| p.as_ref()).collect();
            collect_campaigns(conn, &sql, param_refs.as_slice())
        })
    }

    pub fn list_campaigns_by_creator(&self, creator_id: &str) -> Result<Vec<CampaignRow>> {
        self.with_conn(|conn| {
            collect_campaigns(
                conn,
                &format!("{} WHERE creator_id = ?1 ORDER BY created_at", CAMPAIGN_SELECT),
                &[&creator_id],
            )
        })
    }

    // -- Backings --

    /// Insert the backing and bump the parent campaign's running total in a
    /// single transaction, so the two can never diverge.
    pub fn create_backing(
        &self,
        id: &str,
        campaign_id: &str,
        backer_id: &str,
        amount: f64,
        message: Option<&str>,
    ) -> Result<()> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            tx.execute(
                "INSERT INTO backings (id, campaign_id, backer_id, amount, message)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![id, campaign_id, backer_id, amount, message],
            )?;
            tx.execute(
                "UPDATE campaigns SET current_amount = current_amount + ?1 WHERE id = ?2",
                params![amount, campaign_id],
            )?;
            tx.commit()?;
            Ok(())
        })
    }

    pub fn list_backings_for_campaign(&self, campaign_id: &str) -> Result<Vec<BackingRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, campaign_id, backer_id, amount, message, created_at
                 FROM backings WHERE campaign_id = ?1 ORDER BY created_at",
            )?;
            let rows = stmt
                .query_map([campaign_id], backing_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn list_backings_for_backer(&self, backer_id: &str) -> Result<Vec<BackingRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, campaign_id, backer_id, amount, message, created_at
                 FROM backings WHERE backer_id = ?1 ORDER BY created_at",
            )?;
            let rows = stmt
                .query_map([backer_id], backing_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    // -- Updates --

    pub fn insert_update(
        &self,
        id: &str,
        campaign_id: &str,
        title: &str,
        content: &str,
    ) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO updates (id, campaign_id, title, content) VALUES (?1, ?2, ?3, ?4)",
                params![id, campaign_id, title, content],
            )?;
            Ok(())
        })
    }

    pub fn list_updates_for_campaign(&self, campaign_id: &str) -> Result<Vec<UpdateRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, campaign_id, title, content, created_at
                 FROM updates WHERE campaign_id = ?1 ORDER BY created_at",
            )?;
            let rows = stmt
                .query_map([campaign_id], update_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    // -- Freelancer profiles --

    /// One profile per user: a second submit updates the existing row in
    /// place and refreshes updated_at, keeping the original id and created_at.
    pub fn upsert_profile(
        &self,
        id: &str,
        user_id: &str,
        skills_json: &str,
        document_name: Option<&str>,
        years_experience: u32,
        co_build_link: Option<&str>,
    ) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO freelancer_profiles
                     (id, user_id, skills, document_name, years_experience, co_build_link)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                 ON CONFLICT(user_id) DO UPDATE SET
                     skills = excluded.skills,
                     document_name = excluded.document_name,
                     years_experience = excluded.years_experience,
                     co_build_link = excluded.co_build_link,
                     updated_at = datetime('now')",
                params![id, user_id, skills_json, document_name, years_experience, co_build_link],
            )?;
            Ok(())
        })
    }

    pub fn get_profile_by_user(&self, user_id: &str) -> Result<Option<ProfileRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, user_id, skills, document_name, years_experience, co_build_link,
                        created_at, updated_at
                 FROM freelancer_profiles WHERE user_id = ?1",
            )?;
            stmt.query_row([user_id], profile_from_row).optional()
        })
    }
}

const CAMPAIGN_SELECT: &str = "SELECT id, title, description, category, goal_amount, current_amount, \
                               image_url, status, end_date, creator_id, created_at FROM campaigns";

fn collect_campaigns(
    conn: &Connection,
    sql: &str,
    params: &[&dyn rusqlite::types::ToSql],
) -> Result<Vec<CampaignRow>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params, campaign_from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

fn account_from_row(row: &Row) -> rusqlite::Result<AccountRow> {
    Ok(AccountRow {
        id: row.get(0)?,
        email: row.get(1)?,
        password: row.get(2)?,
        full_name: row.get(3)?,
        role: row.get(4)?,
        created_at: row.get(5)?,
    })
}

fn campaign_from_row(row: &Row) -> rusqlite::Result<CampaignRow> {
    Ok(CampaignRow {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        category: row.get(3)?,
        goal_amount: row.get(4)?,
        current_amount: row.get(5)?,
        image_url: row.get(6)?,
        status: row.get(7)?,
        end_date: row.get(8)?,
        creator_id: row.get(9)?,
        created_at: row.get(10)?,
    })
}

fn backing_from_row(row: &Row) -> rusqlite::Result<BackingRow> {
    Ok(BackingRow {
        id: row.get(0)?,
        campaign_id: row.get(1)?,
        backer_id: row.get(2)?,
        amount: row.get(3)?,
        message: row.get(4)?,
        created_at: row.get(5)?,
    })
}

fn update_from_row(row: &Row) -> rusqlite::Result<UpdateRow> {
    Ok(UpdateRow {
        id: row.get(0)?,
        campaign_id: row.get(1)?,
        title: row.get(2)?,
        content: row.get(3)?,
        created_at: row.get(4)?,
    })
}

fn profile_from_row(row: &Row) -> rusqlite::Result<ProfileRow> {
    Ok(ProfileRow {
        id: row.get(0)?,
        user_id: row.get(1)?,
        skills: row.get(2)?,
        document_name: row.get(3)?,
        years_experience: row.get(4)?,
        co_build_link: row.get(5)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}

/// Extension trait for optional query results
trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn test_db() -> Database {
        Database::open_in_memory().unwrap()
    }

    fn add_account(db: &Database, email: &str, role: &str) -> String {
        let id = Uuid::new_v4().to_string();
        db.create_account(&id, email, "hash", "Test User", role)
            .unwrap();
        id
    }

    #[test]
    fn duplicate_email_rejected() {
        let db = test_db();
        add_account(&db, "alice@example.com", "investor");

        let id = Uuid::new_v4().to_string();
        let result = db.create_account(&id, "alice@example.com", "hash2", "Alice Again", "investor");
        assert!(result.is_err());

        let row = db.get_account_by_email("alice@example.com").unwrap().unwrap();
        assert_eq!(row.full_name, "Test User");
    }

    #[test]
    fn email_lookup_is_case_sensitive() {
        let db = test_db();
        add_account(&db, "alice@example.com", "investor");
        assert!(db.get_account_by_email("Alice@example.com").unwrap().is_none());
    }

    #[test]
    fn seeded_catalog_search() {
        let db = test_db();
        assert_eq!(db.list_campaigns().unwrap().len(), 5);

        // "eco" with no category filter hits exactly one campaign
        let hits = db.search_campaigns(Some("eco"), None).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "Eco-Friendly Fashion Line");

        let tech = db.search_campaigns(None, Some("technology")).unwrap();
        assert_eq!(tech.len(), 2);

        // text and category conjoin
        let none = db.search_campaigns(Some("eco"), Some("food")).unwrap();
        assert!(none.is_empty());
    }

    #[test]
    fn search_matches_description_too() {
        let db = test_db();
        let hits = db.search_campaigns(Some("plant-based"), None).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "Gourmet Vegan Food Truck");
    }

    #[test]
    fn new_campaign_gets_defaults() {
        let db = test_db();
        db.insert_campaign(
            "c1",
            "Solar Backpacks",
            "Backpacks with integrated solar panels.",
            "technology",
            50000.0,
            "",
            "2026-06-30",
            "creator-1",
        )
        .unwrap();

        let row = db.get_campaign("c1").unwrap().unwrap();
        assert_eq!(row.current_amount, 0.0);
        assert_eq!(row.status, "active");
    }

    #[test]
    fn backing_increments_campaign_total() {
        let db = test_db();
        let backer = add_account(&db, "inv@example.com", "investor");

        let before = db.get_campaign("1").unwrap().unwrap().current_amount;
        db.create_backing("b1", "1", &backer, 250.0, Some("Good luck!"))
            .unwrap();
        let after = db.get_campaign("1").unwrap().unwrap().current_amount;
        assert_eq!(after, before + 250.0);

        let backings = db.list_backings_for_campaign("1").unwrap();
        assert_eq!(backings.len(), 1);
        assert_eq!(backings[0].amount, 250.0);

        let mine = db.list_backings_for_backer(&backer).unwrap();
        assert_eq!(mine.len(), 1);
    }

    #[test]
    fn backing_requires_existing_campaign() {
        let db = test_db();
        let backer = add_account(&db, "inv@example.com", "investor");
        let result = db.create_backing("b1", "no-such-campaign", &backer, 100.0, None);
        assert!(result.is_err());
    }

    #[test]
    fn profile_upsert_updates_in_place() {
        let db = test_db();
        let user = add_account(&db, "free@example.com", "freelancer");

        db.upsert_profile("p1", &user, r#"["rust"]"#, None, 2, None)
            .unwrap();
        db.upsert_profile("p2", &user, r#"["rust","sql"]"#, Some("cv.pdf"), 3, None)
            .unwrap();

        let count: i64 = db
            .with_conn(|conn| {
                Ok(conn.query_row(
                    "SELECT COUNT(*) FROM freelancer_profiles WHERE user_id = ?1",
                    [&user],
                    |row| row.get(0),
                )?)
            })
            .unwrap();
        assert_eq!(count, 1);

        let row = db.get_profile_by_user(&user).unwrap().unwrap();
        // id from the first insert survives the upsert
        assert_eq!(row.id, "p1");
        assert_eq!(row.skills, r#"["rust","sql"]"#);
        assert_eq!(row.years_experience, 3);
        assert_eq!(row.document_name.as_deref(), Some("cv.pdf"));
    }

    #[test]
    fn updates_listed_per_campaign() {
        let db = test_db();
        db.insert_update("u1", "1", "Fabric sourced", "We found a recycled-fiber supplier.")
            .unwrap();
        db.insert_update("u2", "2", "Truck purchased", "The truck arrives next month.")
            .unwrap();

        let ours = db.list_updates_for_campaign("1").unwrap();
        assert_eq!(ours.len(), 1);
        assert_eq!(ours[0].title, "Fabric sourced");
    }
}
