use multimodal_live::types::{ConnectionState, LiveEvent, SessionConfigurator};
use multimodal_live::utils;
use multimodal_live::utils::audio::LIVE_API_INPUT_SAMPLE_RATE;
use rubato::Resampler;
use tracing::Level;
use tracing_subscriber::fmt::time::ChronoLocal;

const CHUNK_SIZE: usize = 1024;

/// Streams a WAV file as realtime input and prints the model's reply.
///
/// usage: cargo run --example wav --features utils -- <file.wav>
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv_override().ok();
    tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_timer(ChronoLocal::rfc_3339())
        .init();

    let path = std::env::args().nth(1).ok_or_else(|| anyhow::anyhow!("missing wav path"))?;
    let mut reader = hound::WavReader::open(&path)?;
    let spec = reader.spec();
    let channels = spec.channels as usize;
    let samples: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader.samples::<f32>().collect::<Result<_, _>>()?,
        hound::SampleFormat::Int => {
            let scale = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|s| s as f32 / scale))
                .collect::<Result<_, _>>()?
        }
    };
    // first channel only
    let mono: Vec<f32> = samples.iter().step_by(channels.max(1)).copied().collect();
    println!("wav: {} samples at {} Hz", mono.len(), spec.sample_rate);

    let mut resampler = utils::audio::create_resampler(spec.sample_rate as f64, LIVE_API_INPUT_SAMPLE_RATE, CHUNK_SIZE)?;
    let mut resampled = Vec::with_capacity(mono.len());
    for chunk in utils::audio::split_for_chunks(&mono, CHUNK_SIZE) {
        let out = resampler.process(&[chunk], None)?;
        resampled.extend_from_slice(&out[0]);
    }

    let session = SessionConfigurator::new("models/gemini-2.0-flash-exp")
        .with_text_only()
        .build();
    let client = multimodal_live::connect(session).await?;

    let mut events = client.subscribe();
    tokio::spawn(async move {
        while let Ok(e) = events.recv().await {
            match e {
                LiveEvent::Content { content } => println!("{}", content),
                LiveEvent::Log(entry) => tracing::debug!("{} {}", entry.category(), entry.payload()),
                _ => {}
            }
        }
    });

    client
        .watch_state()
        .wait_for(|state| *state == ConnectionState::Ready)
        .await?;

    let chunks = utils::audio::to_media_chunks(&resampled, CHUNK_SIZE);
    println!("sending {} chunks", chunks.len());
    for chunk in chunks {
        client.send_realtime_input(vec![chunk]);
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    }

    tokio::time::sleep(std::time::Duration::from_secs(10)).await;
    client.disconnect();
    Ok(())
}
