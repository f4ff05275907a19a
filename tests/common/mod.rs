//! Shared fixtures for integration tests: in-memory stores, a fake renderer
//! and token helpers.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde_json::{json, Value};
use uuid::Uuid;

use smartfill_server::auth::generate_access_token;
use smartfill_server::render::{DocumentRenderer, RenderError, RenderRequest, RenderedFile};
use smartfill_server::store::{MemoryGuestSessionStore, MemoryStore};
use smartfill_server::template::Template;
use smartfill_server::AppState;

pub const SECRET: &str = "test-secret";
pub const GUEST_ID: &str = "guest-3f2a";

/// Renderer that skips Typst and echoes the final content as the file body.
#[derive(Default)]
pub struct FakeRenderer {
    calls: AtomicUsize,
    fail: bool,
}

impl FakeRenderer {
    pub fn failing() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail: true,
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl DocumentRenderer for FakeRenderer {
    fn render_to_file(&self, request: &RenderRequest) -> Result<RenderedFile, RenderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(RenderError::TypstExit(1));
        }
        Ok(RenderedFile {
            filename: "document.pdf".to_string(),
            mime_type: "application/pdf".to_string(),
            bytes: format!("%PDF-fake\n{}", request.content).into_bytes(),
        })
    }
}

pub struct TestContext {
    pub state: AppState,
    pub store: Arc<MemoryStore>,
    pub renderer: Arc<FakeRenderer>,
}

/// Build an `AppState` over in-memory stores. Needs a running runtime for the
/// persistence worker.
pub fn context(templates: Vec<Template>) -> TestContext {
    context_with_renderer(templates, FakeRenderer::default())
}

pub fn context_with_renderer(templates: Vec<Template>, renderer: FakeRenderer) -> TestContext {
    let store = Arc::new(MemoryStore::with_templates(templates));
    let renderer = Arc::new(renderer);
    let state = AppState::with_stores(
        store.clone(),
        store.clone(),
        Arc::new(MemoryGuestSessionStore::new(Duration::from_secs(60))),
        renderer.clone(),
        SECRET,
    );
    TestContext {
        state,
        store,
        renderer,
    }
}

pub fn bearer(user_id: &str) -> String {
    let token = generate_access_token(user_id, Some("user@example.com"), SECRET).unwrap();
    format!("Bearer {token}")
}

pub fn variable(name: &str, label: &str, required: bool) -> Value {
    json!({ "name": name, "label": label, "type": "text", "required": required })
}

pub fn template(name: &str, content: &str, variables: Value) -> Template {
    Template {
        id: Uuid::new_v4(),
        name: name.to_string(),
        content: Some(content.to_string()),
        variables,
    }
}

/// Four variables, two of them required.
pub fn lease_template() -> Template {
    template(
        "Contrat de bail",
        "Je soussigné {nom}, âgé de {{ age }} ans.\nDomicilié à {adresse}.\nFait à {ville}.",
        json!([
            variable("nom", "Nom", true),
            { "name": "age", "label": "Âge", "type": "number" },
            variable("adresse", "Adresse", true),
            variable("ville", "Ville", false),
            { "name": "", "label": "Ignoré", "type": "text" }
        ]),
    )
}

/// Twelve optional variables, three live steps.
pub fn long_template() -> Template {
    let variables: Vec<Value> = (1..=12)
        .map(|i| variable(&format!("champ_{i}"), &format!("Champ {i}"), false))
        .collect();
    template("Formulaire long", "{champ_1} … {champ_12}", Value::Array(variables))
}

pub fn empty_template() -> Template {
    template("Note libre", "Texte sans variable.", json!([]))
}

/// Wait for the persistence worker to catch up.
pub async fn wait_for_documents(store: &MemoryStore, expected: usize) -> usize {
    for _ in 0..50 {
        let count = store.documents().len();
        if count >= expected {
            return count;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    store.documents().len()
}

/// Full application with in-memory collaborators.
#[allow(unused_macros)]
macro_rules! init_app {
    ($state:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(actix_web::web::Data::new($state))
                .app_data(smartfill_server::mcp_state())
                .service(actix_web::web::scope("/api").configure(smartfill_server::configure_api))
                .configure(smartfill_server::mcp::config),
        )
        .await
    };
}
