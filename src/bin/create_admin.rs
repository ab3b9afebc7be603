use folio::config::CONFIG;
use folio::service::accounts;
use std::env;
use std::io::{self, BufRead, Write};

fn prompt(label: &str) -> io::Result<String> {
    print!("{label}: ");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let mut args = env::args().skip(1);
    let username = match args.next() {
        Some(name) => name,
        None => prompt("Username").unwrap_or_else(|e| {
            eprintln!("Error reading username: {e}");
            std::process::exit(1);
        }),
    };
    let password = match args.next() {
        Some(pass) => pass,
        None => prompt("Password").unwrap_or_else(|e| {
            eprintln!("Error reading password: {e}");
            std::process::exit(1);
        }),
    };

    let storage = match folio::db::connect(&CONFIG.database_url).await {
        Ok(storage) => storage,
        Err(e) => {
            eprintln!("Error opening {}: {e}", CONFIG.database_url);
            std::process::exit(1);
        }
    };

    match accounts::create_admin(&storage, &username, &password).await {
        Ok(id) => println!("Admin '{}' created with id {id}.", username.trim()),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}
