use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS accounts (
            id          TEXT PRIMARY KEY,
            email       TEXT NOT NULL UNIQUE,
            password    TEXT NOT NULL,
            full_name   TEXT NOT NULL,
            role        TEXT NOT NULL CHECK (role IN ('entrepreneur', 'investor', 'freelancer')),
            created_at  TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS campaigns (
            id              TEXT PRIMARY KEY,
            title           TEXT NOT NULL,
            description     TEXT NOT NULL,
            category        TEXT NOT NULL,
            goal_amount     REAL NOT NULL CHECK (goal_amount > 0),
            current_amount  REAL NOT NULL DEFAULT 0 CHECK (current_amount >= 0),
            image_url       TEXT NOT NULL DEFAULT '',
            status          TEXT NOT NULL DEFAULT 'active'
                                CHECK (status IN ('active', 'completed', 'cancelled')),
            end_date        TEXT NOT NULL,
            creator_id      TEXT NOT NULL,
            created_at      TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX IF NOT EXISTS idx_campaigns_creator
            ON campaigns(creator_id);

        CREATE TABLE IF NOT EXISTS backings (
            id           TEXT PRIMARY KEY,
            campaign_id  TEXT NOT NULL REFERENCES campaigns(id),
            backer_id    TEXT NOT NULL REFERENCES accounts(id),
            amount       REAL NOT NULL CHECK (amount > 0),
            message      TEXT,
            created_at   TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX IF NOT EXISTS idx_backings_campaign
            ON backings(campaign_id);
        CREATE INDEX IF NOT EXISTS idx_backings_backer
            ON backings(backer_id);

        CREATE TABLE IF NOT EXISTS updates (
            id           TEXT PRIMARY KEY,
            campaign_id  TEXT NOT NULL REFERENCES campaigns(id),
            title        TEXT NOT NULL,
            content      TEXT NOT NULL,
            created_at   TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX IF NOT EXISTS idx_updates_campaign
            ON updates(campaign_id);

        CREATE TABLE IF NOT EXISTS freelancer_profiles (
            id                TEXT PRIMARY KEY,
            user_id           TEXT NOT NULL UNIQUE REFERENCES accounts(id),
            skills            TEXT NOT NULL,
            document_name     TEXT,
            years_experience  INTEGER NOT NULL CHECK (years_experience >= 0),
            co_build_link     TEXT,
            created_at        TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at        TEXT NOT NULL DEFAULT (datetime('now'))
        );

        -- Seed the sample campaign catalog. Creator ids predate the accounts
        -- table, which is why campaigns.creator_id carries no foreign key.
        INSERT OR IGNORE INTO campaigns
            (id, title, description, category, goal_amount, current_amount, image_url, status, end_date, creator_id)
        VALUES
            ('1', 'Eco-Friendly Fashion Line',
             'A new line of sustainable clothing made from recycled materials.',
             'fashion', 25000, 18000, '/assets/Eco-Friendly-Fashion-Line.jpg',
             'active', '2025-12-31', 'user123'),
            ('2', 'Gourmet Vegan Food Truck',
             'Bringing delicious and innovative plant-based meals to the city.',
             'food', 15000, 16500, '/assets/Gourmet-Vegan-Food-Truck.jpg',
             'active', '2026-01-15', 'user456'),
            ('3', 'Handcrafted Artisan Jewelry',
             'Unique, handcrafted jewelry pieces made with ethically sourced materials.',
             'fashion', 10000, 3000, '/assets/Handcrafted-Artisan-Jewelry.jpg',
             'active', '2025-11-30', 'user789'),
            ('4', 'AI-Powered Language Learning App',
             'An innovative app that uses AI to create personalized language learning plans.',
             'technology', 50000, 42000, '/assets/AI-Powered-Language-Learning-App.jpg',
             'active', '2026-02-28', 'user101'),
            ('5', 'Quantum Computing for Everyone',
             'A project to make quantum computing accessible and understandable to the public.',
             'technology', 100000, 75000, '/assets/Quantum-Computing-for-Everyone.jpg',
             'active', '2026-03-31', 'user112');
        ",
    )?;

    info!("Database migrations complete");
    Ok(())
}
