use multimodal_live::types::{ConnectionState, LiveEvent, SessionConfigurator};
use tracing::Level;
use tracing_subscriber::fmt::time::ChronoLocal;

#[tokio::main]
async fn main() {
    dotenvy::dotenv_override().ok();
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .with_timer(ChronoLocal::rfc_3339())
        .init();

    let session = SessionConfigurator::new("models/gemini-2.0-flash-exp")
        .with_text_only()
        .build();
    let client = multimodal_live::connect(session).await.expect("failed to connect");

    let mut events = client.subscribe();
    tokio::spawn(async move {
        while let Ok(e) = events.recv().await {
            match e {
                LiveEvent::Content { content } => println!("{}", content),
                LiveEvent::Close { reason } => println!("closed: {:?}", reason),
                _ => {}
            }
        }
    });

    let mut state = client.watch_state();
    state
        .wait_for(|state| *state == ConnectionState::Ready)
        .await
        .expect("client dropped");
    println!("Connected to the Multimodal Live API");

    client.send_text("Hello!");

    tokio::time::sleep(std::time::Duration::from_secs(10)).await;
    client.disconnect();
}
