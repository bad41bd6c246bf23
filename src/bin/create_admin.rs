//! Provisions an administrator account. Admins cannot be created through
//! the signup endpoint, so operators run this against the live database:
//!
//!   create_admin <email> <password> <first-name> <last-name>

use std::env;

use anyhow::{bail, Context, Result};
use diesel::prelude::*;
use uuid::Uuid;

use coreboard::{
    auth::password,
    config::AppConfig,
    db,
    models::{NewProfile, NewUser},
    schema::{profiles, users},
};

fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let args: Vec<String> = env::args().skip(1).collect();
    let [email, pass, first_name, last_name] = args.as_slice() else {
        eprintln!("Usage: create_admin <email> <password> <first-name> <last-name>");
        std::process::exit(1);
    };

    if pass.len() < 6 {
        bail!("password must be at least 6 characters");
    }
    // Login lowercases the email, so store it lowercased too.
    let email = email.trim().to_lowercase();

    let config = AppConfig::from_env()?;
    let pool = db::init_pool_with_size(&config.database_url, 1)?;
    let mut conn = pool.get().context("failed to get database connection")?;

    let password_hash = password::hash_password(pass)?;
    let user_id = Uuid::new_v4();
    let profile_id = Uuid::new_v4();

    conn.transaction(|conn| {
        diesel::insert_into(users::table)
            .values(&NewUser {
                id: user_id,
                email: email.clone(),
                password_hash,
            })
            .execute(conn)?;

        diesel::insert_into(profiles::table)
            .values(&NewProfile {
                id: profile_id,
                user_id,
                role: "admin".to_string(),
                first_name: first_name.clone(),
                last_name: last_name.clone(),
                email: email.clone(),
            })
            .execute(conn)?;

        Ok::<_, diesel::result::Error>(())
    })
    .context("failed to create admin account")?;

    println!("Admin account created: {email} (profile {profile_id})");
    Ok(())
}
