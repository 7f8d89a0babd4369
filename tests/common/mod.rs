use form_bridge::{
    encoder::Document,
    telemetry,
    transport::{FormRequest, FormResponse},
};
use tokio::{sync::mpsc, task::JoinHandle};

/// How the simulated client answers each form.
#[derive(Clone, Copy)]
pub enum Answer {
    Defaults,
    Close,
}

// Spawns a fake client that answers every request it receives
pub fn spawn_client(
    mut requests: mpsc::UnboundedReceiver<FormRequest>,
    answer: Answer,
) -> (mpsc::UnboundedReceiver<FormResponse>, JoinHandle<()>) {
    telemetry::init_tracing();

    let (tx, rx) = mpsc::unbounded_channel();
    let handle = tokio::spawn(async move {
        while let Some(request) = requests.recv().await {
            let document: Document =
                serde_json::from_slice(&request.form_data).expect("client got invalid form data");
            let response_data = match answer {
                Answer::Defaults => {
                    let mut data = serde_json::to_vec(&document.default_response()).unwrap();
                    data.push(b'\n');
                    data
                }
                Answer::Close => b"null\n".to_vec(),
            };
            let response = FormResponse {
                form_id: request.form_id,
                response_data,
            };
            if tx.send(response).is_err() {
                break;
            }
        }
    });

    (rx, handle)
}
