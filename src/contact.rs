use crate::logging::{log_event, LogLevel};
use crate::notice::NoticeKind;
use crate::relay::{MessageRelay, RelayError};
use regex::Regex;
use serde_json::json;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::sync::LazyLock;

pub const INVALID_FORM_MESSAGE: &str = "Please fill in all required fields correctly";
pub const SENT_MESSAGE: &str = "Message sent successfully!";
pub const FAILED_MESSAGE: &str = "Failed to send message. Please try again.";
const INVALID_EMAIL_MESSAGE: &str = "Email is invalid";

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\S+@\S+\.\S+").expect("email pattern compiles"));

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum Field {
    Name,
    Email,
    Subject,
    Message,
}

impl Field {
    pub const ALL: [Self; 4] = [Self::Name, Self::Email, Self::Subject, Self::Message];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Subject => "subject",
            Self::Message => "message",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Email => "Email",
            Self::Subject => "Subject",
            Self::Message => "Message",
        }
    }

    pub fn placeholder(self) -> &'static str {
        match self {
            Self::Name => "Your name",
            Self::Email => "your@email.com",
            Self::Subject => "Message subject",
            Self::Message => "Your message...",
        }
    }

    fn required_message(self) -> &'static str {
        match self {
            Self::Name => "Name is required",
            Self::Email => "Email is required",
            Self::Subject => "Subject is required",
            Self::Message => "Message is required",
        }
    }
}

#[derive(Clone, Default, PartialEq, Eq, Debug)]
pub struct ContactFormData {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

impl ContactFormData {
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Email => &self.email,
            Field::Subject => &self.subject,
            Field::Message => &self.message,
        }
    }

    fn slot(&mut self, field: Field) -> &mut String {
        match field {
            Field::Name => &mut self.name,
            Field::Email => &mut self.email,
            Field::Subject => &mut self.subject,
            Field::Message => &mut self.message,
        }
    }
}

pub type ValidationErrors = BTreeMap<Field, &'static str>;

pub fn validate(data: &ContactFormData) -> ValidationErrors {
    let mut errors = ValidationErrors::new();

    for field in Field::ALL {
        let value = data.get(field);
        if value.trim().is_empty() {
            errors.insert(field, field.required_message());
        } else if field == Field::Email && !EMAIL_PATTERN.is_match(value) {
            errors.insert(field, INVALID_EMAIL_MESSAGE);
        }
    }

    errors
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SubmitRejected {
    AlreadySubmitting,
    Invalid,
}

impl SubmitRejected {
    pub fn notice(self) -> Option<(NoticeKind, &'static str)> {
        match self {
            Self::AlreadySubmitting => None,
            Self::Invalid => Some((NoticeKind::Error, INVALID_FORM_MESSAGE)),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SubmitOutcome {
    Sent,
    Failed,
}

impl SubmitOutcome {
    pub fn notice(self) -> (NoticeKind, &'static str) {
        match self {
            Self::Sent => (NoticeKind::Success, SENT_MESSAGE),
            Self::Failed => (NoticeKind::Error, FAILED_MESSAGE),
        }
    }
}

#[derive(Clone, Default, PartialEq, Debug)]
pub struct ContactForm {
    data: ContactFormData,
    errors: ValidationErrors,
    submitting: bool,
}

impl ContactForm {
    pub fn data(&self) -> &ContactFormData {
        &self.data
    }

    pub fn error(&self, field: Field) -> Option<&'static str> {
        self.errors.get(&field).copied()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn update_field(&mut self, field: Field, value: impl Into<String>) {
        *self.data.slot(field) = value.into();
        self.errors.remove(&field);
    }

    pub fn begin_submit(&mut self) -> Result<ContactFormData, SubmitRejected> {
        if self.submitting {
            return Err(SubmitRejected::AlreadySubmitting);
        }

        self.errors = validate(&self.data);
        if !self.errors.is_empty() {
            return Err(SubmitRejected::Invalid);
        }

        self.submitting = true;
        Ok(self.data.clone())
    }

    pub fn finish_submit(&mut self, result: Result<(), RelayError>) -> SubmitOutcome {
        self.submitting = false;

        match result {
            Ok(()) => {
                self.data = ContactFormData::default();
                self.errors.clear();
                SubmitOutcome::Sent
            }
            Err(error) => {
                log_event(
                    LogLevel::Warn,
                    "contact_submit_failed",
                    json!({ "error": error.to_string() }),
                );
                SubmitOutcome::Failed
            }
        }
    }
}

// No borrow of `form` is held across the relay call.
pub async fn submit<R>(
    form: &RefCell<ContactForm>,
    relay: &R,
    refresh: impl Fn(),
) -> Result<SubmitOutcome, SubmitRejected>
where
    R: MessageRelay + ?Sized,
{
    let begun = form.borrow_mut().begin_submit();
    refresh();
    let message = begun?;

    let result = relay.deliver(&message).await;
    let outcome = form.borrow_mut().finish_submit(result);
    refresh();

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relay::RelayReply;
    use std::cell::Cell;

    struct StubRelay {
        reply: Result<(), RelayError>,
        calls: Cell<usize>,
    }

    impl StubRelay {
        fn replying(reply: Result<(), RelayError>) -> Self {
            Self {
                reply,
                calls: Cell::new(0),
            }
        }
    }

    impl MessageRelay for StubRelay {
        async fn deliver(&self, _message: &ContactFormData) -> Result<(), RelayError> {
            self.calls.set(self.calls.get() + 1);
            self.reply.clone()
        }
    }

    fn filled_form() -> ContactForm {
        let mut form = ContactForm::default();
        form.update_field(Field::Name, "Ada Lovelace");
        form.update_field(Field::Email, "ada@example.com");
        form.update_field(Field::Subject, "Engines");
        form.update_field(Field::Message, "Let's talk about the analytical engine.");
        form
    }

    #[tokio::test]
    async fn blank_field_is_reported_and_relay_is_not_called() {
        for field in Field::ALL {
            for blank in ["", "   \t"] {
                let mut form = filled_form();
                form.update_field(field, blank);
                let form = RefCell::new(form);
                let relay = StubRelay::replying(Ok(()));

                let result = submit(&form, &relay, || ()).await;

                assert_eq!(result, Err(SubmitRejected::Invalid));
                assert_eq!(relay.calls.get(), 0);
                let form = form.borrow();
                assert_eq!(form.errors.len(), 1, "only {field:?} should fail");
                assert_eq!(form.error(field), Some(field.required_message()));
                assert!(!form.is_submitting());
            }
        }
    }

    #[test]
    fn email_needs_an_at_sign_and_a_domain_dot() {
        for bad in ["ada.example.com", "ada@example", "ada@ example.com"] {
            let mut data = filled_form().data().clone();
            data.email = bad.to_string();

            let errors = validate(&data);

            assert_eq!(errors.get(&Field::Email), Some(&INVALID_EMAIL_MESSAGE), "{bad}");
        }

        let mut data = filled_form().data().clone();
        data.email = "a@b.co".to_string();
        assert!(validate(&data).is_empty());
    }

    #[test]
    fn validate_reports_every_blank_field_at_once() {
        let errors = validate(&ContactFormData::default());

        assert_eq!(errors.keys().copied().collect::<Vec<_>>(), Field::ALL.to_vec());
        assert_eq!(errors.get(&Field::Email), Some(&"Email is required"));
    }

    #[test]
    fn editing_a_field_clears_only_its_error() {
        let mut form = ContactForm::default();
        assert_eq!(form.begin_submit(), Err(SubmitRejected::Invalid));
        assert_eq!(form.errors.len(), 4);

        form.update_field(Field::Subject, "H");

        assert_eq!(form.error(Field::Subject), None);
        assert!(form.error(Field::Name).is_some());
        assert!(form.error(Field::Email).is_some());
        assert!(form.error(Field::Message).is_some());
        assert_eq!(form.data().subject, "H");
    }

    #[tokio::test]
    async fn successful_delivery_clears_fields_and_errors() {
        let form = RefCell::new(filled_form());
        let relay = StubRelay::replying(Ok(()));
        let refreshes = Cell::new(0);

        let outcome = submit(&form, &relay, || refreshes.set(refreshes.get() + 1)).await;

        assert_eq!(outcome, Ok(SubmitOutcome::Sent));
        assert_eq!(relay.calls.get(), 1);
        assert_eq!(refreshes.get(), 2);
        let form = form.borrow();
        assert_eq!(form.data(), &ContactFormData::default());
        assert!(form.errors.is_empty());
        assert!(!form.is_submitting());
    }

    #[tokio::test]
    async fn failed_delivery_keeps_fields_and_resets_submitting() {
        let form = RefCell::new(filled_form());
        let before = form.borrow().data().clone();
        let relay = StubRelay::replying(Err(RelayError::Transport("offline".to_string())));

        let outcome = submit(&form, &relay, || ()).await;

        assert_eq!(outcome, Ok(SubmitOutcome::Failed));
        assert_eq!(outcome.map(SubmitOutcome::notice), Ok((NoticeKind::Error, FAILED_MESSAGE)));
        let form = form.borrow();
        assert_eq!(form.data(), &before);
        assert!(!form.is_submitting());
    }

    #[tokio::test]
    async fn success_status_without_ok_text_is_a_failed_delivery() {
        let form = RefCell::new(filled_form());
        let reply = RelayReply {
            status: 200,
            text: "queued".to_string(),
        };
        let relay = StubRelay::replying(reply.into_result());

        let outcome = submit(&form, &relay, || ()).await;

        assert_eq!(outcome, Ok(SubmitOutcome::Failed));
        assert_eq!(relay.calls.get(), 1);
        assert_eq!(form.borrow().data(), filled_form().data());
    }

    #[test]
    fn second_submit_while_in_flight_is_rejected() {
        let mut form = filled_form();
        form.begin_submit().expect("first submit starts");

        assert_eq!(form.begin_submit(), Err(SubmitRejected::AlreadySubmitting));
        assert_eq!(SubmitRejected::AlreadySubmitting.notice(), None);

        form.finish_submit(Ok(()));
        assert!(!form.is_submitting());
    }
}
