use form_bridge::{
    config::Config,
    encoder::Document,
    form::{Button, CustomForm, Element, MenuForm, ModalForm},
    session::FormSession,
    telemetry,
    transport::{ChannelTransport, FormResponse},
};
use tokio::sync::mpsc;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    telemetry::init_tracing();

    // Load configuration
    let config = Config::load()?;
    tracing::info!("Loaded configuration: {:?}", config);

    let (transport, mut requests) = ChannelTransport::new();
    let session = FormSession::from_config(transport, &config.forms);

    // Loopback client accepting every form as shown
    let (responses_tx, mut responses) = mpsc::unbounded_channel();
    let client = tokio::spawn(async move {
        while let Some(request) = requests.recv().await {
            let document: Document = serde_json::from_slice(&request.form_data)?;
            tracing::info!(form_id = request.form_id, "Client displaying {document:?}");

            let mut response_data = serde_json::to_vec(&document.default_response())?;
            response_data.push(b'\n');
            let response = FormResponse {
                form_id: request.form_id,
                response_data,
            };
            if responses_tx.send(response).is_err() {
                break;
            }
        }
        Ok::<_, color_eyre::Report>(())
    });

    session.send(ModalForm::new(
        "Confirm",
        "Are you sure?",
        "Yes",
        "No",
        |confirmed| {
            tracing::info!(confirmed, "Modal answered");
            Ok(())
        },
    ))?;
    session.send(
        MenuForm::new("Warp", "Where to?", |selection| {
            tracing::info!(button = %selection.button.text, "Menu answered");
            Ok(())
        })
        .with_button(Button::new("Spawn").with_image("textures/ui/spawn"))
        .with_button(Button::new("Arena").with_image("https://example.com/arena.png")),
    )?;
    session.send(
        CustomForm::new("Settings", |values| {
            tracing::info!(?values, "Settings answered");
            Ok(())
        })
        .with_element(Element::label("General"))
        .with_element(Element::toggle("PvP", false))
        .with_element(Element::slider("Volume", 0.0, 100.0, 5.0, 50.0))
        .with_element(Element::dropdown("Difficulty", ["Easy", "Normal", "Hard"], 1)),
    )?;

    while session.pending_len() > 0 {
        let Some(response) = responses.recv().await else {
            break;
        };
        let outcome = session.handle_response(&response);
        tracing::info!(form_id = response.form_id, "Response outcome: {outcome:?}");
    }

    // Dropping the session closes the channel and stops the client
    drop(session);
    client.await??;
    Ok(())
}
