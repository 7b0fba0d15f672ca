use reqwest::Client;
use shared::{
    domain::{Payee, ProductSelection, RegistrationFields},
    protocol::{SubmitErrorResponse, SubmitRequest},
};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{info, warn};

pub mod config;
pub mod upi;

pub use config::{load_config, BookingConfig};

pub const GENERIC_TRANSPORT_ERROR: &str = "Error connecting to server.";

const MAX_NAME_CHARS: usize = 20;
const ROLL_NUMBER_CHARS: usize = 7;
const UTR_DIGITS: usize = 12;

/// One of the three pre-submission format checks, ordered; the first failing
/// rule aborts the attempt before any network call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Name cannot exceed 20 characters!")]
    NameTooLong,
    #[error("Roll Number must be exactly 7 characters!")]
    RollNumberLength,
    #[error("Transaction ID must be exactly 12 numeric digits!")]
    UtrFormat,
}

/// Anything that can land in the form's single error slot. The `Display`
/// output is exactly what the student sees.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("{0}")]
    Validation(#[from] ValidationError),
    #[error("{0}")]
    Transport(String),
}

/// Whether a submit call actually reached the backend. `Ignored` means an
/// earlier attempt was still in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Submitted,
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewState {
    #[default]
    Editing,
    Success,
}

#[derive(Debug, Default)]
struct FormState {
    fields: RegistrationFields,
    selection: ProductSelection,
    payee_index: usize,
    in_flight: bool,
    view: ViewState,
    error: Option<SubmitError>,
}

/// Point-in-time view of the form for rendering. The payment URI and QR URL
/// are derived here on every read, so they can never go stale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormSnapshot {
    pub fields: RegistrationFields,
    pub selection: ProductSelection,
    pub payee: Payee,
    pub amount: u32,
    pub payment_uri: String,
    pub qr_image_url: String,
    pub view: ViewState,
    pub in_flight: bool,
    pub error_message: Option<String>,
}

/// The registration form controller. All mutation goes through `&self`
/// methods guarded by one async mutex; the in-flight flag inside is the whole
/// concurrency story, matching the single-attempt submission protocol.
pub struct BookingClient {
    http: Client,
    config: BookingConfig,
    inner: Mutex<FormState>,
}

impl BookingClient {
    pub fn new(mut config: BookingConfig) -> Self {
        // A form without payees has no payment target to derive a link for.
        if config.payees.is_empty() {
            config.payees = BookingConfig::default().payees;
        }
        Self {
            http: Client::new(),
            config,
            inner: Mutex::new(FormState::default()),
        }
    }

    pub fn config(&self) -> &BookingConfig {
        &self.config
    }

    pub async fn set_name(&self, value: impl Into<String>) {
        let mut state = self.inner.lock().await;
        state.fields.name = value.into();
        state.error = None;
    }

    pub async fn set_roll_number(&self, value: impl Into<String>) {
        let mut state = self.inner.lock().await;
        state.fields.roll_number = value.into();
        state.error = None;
    }

    pub async fn set_email(&self, value: impl Into<String>) {
        let mut state = self.inner.lock().await;
        state.fields.email = value.into();
        state.error = None;
    }

    pub async fn set_utr(&self, value: impl Into<String>) {
        let mut state = self.inner.lock().await;
        state.fields.utr = value.into();
        state.error = None;
    }

    pub async fn set_rosemilk(&self, selected: bool) {
        let mut state = self.inner.lock().await;
        state.selection = ProductSelection::from_rosemilk(selected);
    }

    /// Advances to the next payee, wrapping after the last. For the usual
    /// two-entry list this is a binary toggle.
    pub async fn cycle_payee(&self) {
        let mut state = self.inner.lock().await;
        state.payee_index = (state.payee_index + 1) % self.config.payees.len();
    }

    pub async fn snapshot(&self) -> FormSnapshot {
        let state = self.inner.lock().await;
        let payee = self.active_payee(&state);
        let amount = self.config.prices.amount_for(state.selection);
        let payment_uri = upi::payment_uri(&payee, amount, &state.fields.name);
        let qr_image_url = upi::qr_image_url(&self.config.qr_endpoint, &payment_uri);
        FormSnapshot {
            fields: state.fields.clone(),
            selection: state.selection,
            payee,
            amount,
            payment_uri,
            qr_image_url,
            view: state.view,
            in_flight: state.in_flight,
            error_message: state.error.as_ref().map(ToString::to_string),
        }
    }

    /// Validates the fields and, if they pass, performs the single `POST
    /// /submit` attempt. A call while a previous attempt is outstanding is
    /// ignored. Both validation and transport failures land in the form's
    /// error slot and leave the form editable.
    pub async fn submit(&self) -> Result<SubmitOutcome, SubmitError> {
        let request = {
            let mut state = self.inner.lock().await;
            if state.in_flight {
                return Ok(SubmitOutcome::Ignored);
            }
            if let Err(kind) = validate(&state.fields) {
                state.error = Some(SubmitError::Validation(kind));
                return Err(SubmitError::Validation(kind));
            }
            state.error = None;
            state.in_flight = true;
            let payee = self.active_payee(&state);
            SubmitRequest {
                name: state.fields.name.clone(),
                roll_number: state.fields.roll_number.clone(),
                email_id: state.fields.email.clone(),
                utr_id: state.fields.utr.clone(),
                payee_vpa: payee.vpa,
                has_rosemilk: state.selection.has_rosemilk(),
            }
        };

        let result = self.post_submit(&request).await;

        let mut state = self.inner.lock().await;
        state.in_flight = false;
        match result {
            Ok(()) => {
                info!("booking submitted for roll {}", request.roll_number);
                state.view = ViewState::Success;
                Ok(SubmitOutcome::Submitted)
            }
            Err(message) => {
                warn!("booking submission failed: {message}");
                let err = SubmitError::Transport(message);
                state.error = Some(err.clone());
                Err(err)
            }
        }
    }

    /// Leaves the success view and hands back a fresh form: fields, error
    /// slot, and in-flight flag all return to their initial values.
    pub async fn book_more(&self) {
        let mut state = self.inner.lock().await;
        if state.view != ViewState::Success {
            return;
        }
        state.fields = RegistrationFields::default();
        state.error = None;
        state.in_flight = false;
        state.view = ViewState::Editing;
    }

    fn active_payee(&self, state: &FormState) -> Payee {
        self.config.payees[state.payee_index % self.config.payees.len()].clone()
    }

    async fn post_submit(&self, request: &SubmitRequest) -> Result<(), String> {
        let response = match self
            .http
            .post(format!("{}/submit", self.config.backend_url))
            .json(request)
            .send()
            .await
        {
            Ok(response) => response,
            Err(err) => {
                warn!("submit transport failure: {err}");
                return Err(GENERIC_TRANSPORT_ERROR.to_string());
            }
        };

        if response.status().is_success() {
            return Ok(());
        }

        // Prefer the backend's own error text when it sends one.
        match response.json::<SubmitErrorResponse>().await {
            Ok(body) if !body.error.is_empty() => Err(body.error),
            _ => Err(GENERIC_TRANSPORT_ERROR.to_string()),
        }
    }
}

fn validate(fields: &RegistrationFields) -> Result<(), ValidationError> {
    if fields.name.trim().chars().count() > MAX_NAME_CHARS {
        return Err(ValidationError::NameTooLong);
    }
    if fields.roll_number.trim().chars().count() != ROLL_NUMBER_CHARS {
        return Err(ValidationError::RollNumberLength);
    }
    let utr = &fields.utr;
    if utr.len() != UTR_DIGITS || !utr.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ValidationError::UtrFormat);
    }
    Ok(())
}
