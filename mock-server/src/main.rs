use mock_server::{Account, Ccp, Record};
use tokio::net::TcpListener;

fn demo_record(
    id: &str,
    hostname: &str,
    record_type: &str,
    priority: &str,
    destination: &str,
) -> Record {
    Record {
        id: id.to_string(),
        hostname: hostname.to_string(),
        record_type: record_type.to_string(),
        priority: priority.to_string(),
        destination: destination.to_string(),
        deleterecord: false,
        state: "yes".to_string(),
    }
}

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let addr = format!("127.0.0.1:{port}");
    let account = Account::default();
    let db = Ccp::new(account.clone())
        .with_zone(
            "example.com",
            vec![
                demo_record("1", "@", "A", "0", "127.0.0.1"),
                demo_record("2", "@", "MX", "10", "mail.example.com"),
                demo_record("3", "www", "CNAME", "0", "@"),
            ],
        )
        .into_db();
    let listener = TcpListener::bind(&addr).await?;
    println!(
        "listening on {addr} (customer {}, api key {:?})",
        account.customer_number, account.api_key
    );
    mock_server::run(listener, db).await
}
