use std::cell::Cell;
use std::rc::Rc;

use tracing::{debug, error};

use crate::api::submission_client::SubmissionClient;
use crate::config::LandingConfig;
use crate::error::SubmissionError;
use crate::handlers::message_presenter::{
    FormView, MessageKind, MessagePresenter, FAILURE_MESSAGE, INVALID_EMAIL_MESSAGE,
    SUCCESS_MESSAGE,
};
use crate::models::event::TrackedEvent;
use crate::models::submission::Submission;
use crate::repositories::submission_repository::SubmissionRepository;
use crate::tracking::tracker::Tracker;
use crate::utils::timers::{Navigator, Scheduler};
use crate::utils::validation::validate_email;

pub const BUSY_LABEL: &str = "Submitting...";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormState {
    Idle,
    Submitting,
    Succeeded,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Email failed validation; nothing was stored or sent.
    Invalid,
    Submitted,
    Failed,
    /// A submission for this form was already in flight.
    Busy,
    UnknownForm,
}

struct RegisteredForm {
    id: String,
    view: Rc<dyn FormView>,
    idle_label: String,
    state: Cell<FormState>,
}

/// Every signup form on the page, captured once at start-up.
#[derive(Default)]
pub struct FormRegistry {
    forms: Vec<RegisteredForm>,
}

impl FormRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `view`, remembering its current submit label as the one to
    /// restore after each submission.
    pub fn register(&mut self, view: Rc<dyn FormView>) {
        let id = view.form_id();
        let idle_label = view.submit_label();
        self.forms.push(RegisteredForm {
            id,
            view,
            idle_label,
            state: Cell::new(FormState::Idle),
        });
    }

    /// Id to give the form at `position` (one-based) so it stays
    /// addressable: `candidate` when non-empty and unused, otherwise a
    /// positional `email-form-<n>`.
    pub fn assign_id(&self, candidate: &str, position: usize) -> String {
        if !candidate.is_empty() && self.get(candidate).is_none() {
            return candidate.to_string();
        }
        let mut id = format!("email-form-{}", position);
        let mut suffix = 2;
        while self.get(&id).is_some() {
            id = format!("email-form-{}-{}", position, suffix);
            suffix += 1;
        }
        id
    }

    pub fn ids(&self) -> Vec<String> {
        self.forms.iter().map(|f| f.id.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.forms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forms.is_empty()
    }

    fn get(&self, form_id: &str) -> Option<&RegisteredForm> {
        self.forms.iter().find(|f| f.id == form_id)
    }
}

/// Collaborators the controller drives.
pub struct FormServices {
    pub client: Rc<dyn SubmissionClient>,
    pub submissions: SubmissionRepository,
    pub tracker: Rc<dyn Tracker>,
    pub scheduler: Rc<dyn Scheduler>,
    pub navigator: Rc<dyn Navigator>,
}

pub struct FormController {
    registry: FormRegistry,
    services: FormServices,
    presenter: MessagePresenter,
    redirect_target: String,
    redirect_delay_ms: u32,
}

/// Puts the form back to idle when a submission ends, however it ends.
struct RestoreOnExit<'a> {
    form: &'a RegisteredForm,
}

impl Drop for RestoreOnExit<'_> {
    fn drop(&mut self) {
        self.form.view.set_submit_state(true, &self.form.idle_label);
        self.form.state.set(FormState::Idle);
    }
}

impl FormController {
    pub fn new(registry: FormRegistry, services: FormServices, config: &LandingConfig) -> Self {
        let presenter = MessagePresenter::new(services.scheduler.clone(), config.message_ttl_ms);
        Self {
            registry,
            services,
            presenter,
            redirect_target: config.redirect_target.clone(),
            redirect_delay_ms: config.redirect_delay_ms,
        }
    }

    pub fn form_ids(&self) -> Vec<String> {
        self.registry.ids()
    }

    pub fn state(&self, form_id: &str) -> Option<FormState> {
        self.registry.get(form_id).map(|f| f.state.get())
    }

    /// Handles one submit interaction on the form identified by `form_id`.
    pub async fn submit(&self, form_id: &str) -> SubmitOutcome {
        let Some(form) = self.registry.get(form_id) else {
            debug!("Ignoring submit for unregistered form {}", form_id);
            return SubmitOutcome::UnknownForm;
        };
        if form.state.get() != FormState::Idle {
            debug!("Ignoring submit for {} while a submission is in flight", form_id);
            return SubmitOutcome::Busy;
        }

        let email = form.view.email_value().trim().to_string();
        if validate_email(&email).is_err() {
            self.presenter
                .show(&form.view, INVALID_EMAIL_MESSAGE, MessageKind::Error);
            return SubmitOutcome::Invalid;
        }

        form.state.set(FormState::Submitting);
        form.view.set_submit_state(false, BUSY_LABEL);
        let _restore = RestoreOnExit { form };

        match self.deliver(Submission::new(email, form.id.clone())).await {
            Ok(()) => {
                form.state.set(FormState::Succeeded);
                self.services.tracker.track(&TrackedEvent::signup(&form.id));
                self.presenter
                    .show(&form.view, SUCCESS_MESSAGE, MessageKind::Success);
                form.view.clear_email();
                self.schedule_redirect();
                SubmitOutcome::Submitted
            }
            Err(e) => {
                form.state.set(FormState::Failed);
                error!("Form submission error: {}", e);
                self.presenter
                    .show(&form.view, FAILURE_MESSAGE, MessageKind::Error);
                SubmitOutcome::Failed
            }
        }
    }

    /// Local storage is written first so the signup survives a failed
    /// network call.
    async fn deliver(&self, submission: Submission) -> Result<(), SubmissionError> {
        self.services.submissions.append(submission.clone())?;
        self.services.client.submit(&submission).await
    }

    fn schedule_redirect(&self) {
        let navigator = self.services.navigator.clone();
        let target = self.redirect_target.clone();
        self.services.scheduler.schedule(
            self.redirect_delay_ms,
            Box::new(move || navigator.redirect(&target)),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::submission_client::SimulatedSubmissionClient;
    use crate::handlers::message_presenter::{FeedbackMessage, MessageId};
    use crate::repositories::storage::MemoryStore;
    use crate::tracking::tracker::MockTracker;
    use crate::utils::timers::{ManualScheduler, MockNavigator};
    use futures::channel::oneshot;
    use futures::future::LocalBoxFuture;
    use futures::FutureExt;
    use std::cell::RefCell;

    #[derive(Default)]
    struct FakeView {
        id: String,
        email: RefCell<String>,
        label: RefCell<String>,
        enabled: Cell<bool>,
        label_history: RefCell<Vec<(bool, String)>>,
        message: RefCell<Option<FeedbackMessage>>,
    }

    impl FakeView {
        fn new(id: &str, label: &str, email: &str) -> Rc<Self> {
            Rc::new(Self {
                id: id.to_string(),
                email: RefCell::new(email.to_string()),
                label: RefCell::new(label.to_string()),
                enabled: Cell::new(true),
                ..Default::default()
            })
        }
    }

    impl FormView for FakeView {
        fn form_id(&self) -> String {
            self.id.clone()
        }
        fn email_value(&self) -> String {
            self.email.borrow().clone()
        }
        fn clear_email(&self) {
            self.email.borrow_mut().clear();
        }
        fn submit_label(&self) -> String {
            self.label.borrow().clone()
        }
        fn set_submit_state(&self, enabled: bool, label: &str) {
            self.enabled.set(enabled);
            *self.label.borrow_mut() = label.to_string();
            self.label_history.borrow_mut().push((enabled, label.to_string()));
        }
        fn replace_message(&self, message: &FeedbackMessage) {
            *self.message.borrow_mut() = Some(message.clone());
        }
        fn remove_message(&self, id: MessageId) {
            let mut current = self.message.borrow_mut();
            if current.as_ref().map(|m| m.id) == Some(id) {
                *current = None;
            }
        }
    }

    struct FailingClient;

    impl SubmissionClient for FailingClient {
        fn submit<'a>(
            &'a self,
            _submission: &'a Submission,
        ) -> LocalBoxFuture<'a, Result<(), SubmissionError>> {
            async { Err(SubmissionError::Rejected { status: 503 }) }.boxed_local()
        }
    }

    struct OkClient;

    impl SubmissionClient for OkClient {
        fn submit<'a>(
            &'a self,
            _submission: &'a Submission,
        ) -> LocalBoxFuture<'a, Result<(), SubmissionError>> {
            async { Ok(()) }.boxed_local()
        }
    }

    fn controller(
        view: Rc<FakeView>,
        client: Rc<dyn SubmissionClient>,
        tracker: MockTracker,
        navigator: MockNavigator,
        scheduler: &ManualScheduler,
    ) -> (FormController, SubmissionRepository) {
        controller_with_store(view, client, tracker, navigator, scheduler, MemoryStore::new())
    }

    fn controller_with_store(
        view: Rc<FakeView>,
        client: Rc<dyn SubmissionClient>,
        tracker: MockTracker,
        navigator: MockNavigator,
        scheduler: &ManualScheduler,
        store: MemoryStore,
    ) -> (FormController, SubmissionRepository) {
        let mut registry = FormRegistry::new();
        registry.register(view);
        let submissions = SubmissionRepository::new(Rc::new(store));
        let services = FormServices {
            client,
            submissions: submissions.clone(),
            tracker: Rc::new(tracker),
            scheduler: Rc::new(scheduler.clone()),
            navigator: Rc::new(navigator),
        };
        let config = LandingConfig::from_lookup(|_| None);
        (FormController::new(registry, services, &config), submissions)
    }

    #[tokio::test]
    async fn test_valid_submit_stores_tracks_and_redirects() {
        let scheduler = ManualScheduler::new();
        let view = FakeView::new("heroForm", "INITIATE_ACCESS", "  user@example.com ");
        let mut tracker = MockTracker::new();
        tracker
            .expect_track()
            .withf(|e| *e == TrackedEvent::signup("heroForm"))
            .times(1)
            .return_const(());
        let mut navigator = MockNavigator::new();
        navigator
            .expect_redirect()
            .withf(|target| target == "thank-you.html")
            .times(1)
            .return_const(());

        let (controller, submissions) =
            controller(view.clone(), Rc::new(OkClient), tracker, navigator, &scheduler);

        assert_eq!(controller.submit("heroForm").await, SubmitOutcome::Submitted);

        let stored = submissions.all();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].email, "user@example.com");
        assert_eq!(stored[0].form_id, "heroForm");
        assert_eq!(view.email_value(), "");
        assert_eq!(
            view.message.borrow().as_ref().map(|m| m.kind),
            Some(MessageKind::Success)
        );
        assert_eq!(
            *view.label_history.borrow(),
            vec![
                (false, BUSY_LABEL.to_string()),
                (true, "INITIATE_ACCESS".to_string())
            ]
        );
        assert_eq!(controller.state("heroForm"), Some(FormState::Idle));

        scheduler.advance(1999);
        scheduler.advance(1);
        // Success messages never expire on their own.
        assert!(view.message.borrow().is_some());
    }

    #[tokio::test]
    async fn test_invalid_email_touches_nothing() {
        let scheduler = ManualScheduler::new();
        let view = FakeView::new("ctaForm", "SECURE_ALLOCATION", "not-an-email");
        let mut tracker = MockTracker::new();
        tracker.expect_track().never();
        let mut navigator = MockNavigator::new();
        navigator.expect_redirect().never();

        let (controller, submissions) =
            controller(view.clone(), Rc::new(FailingClient), tracker, navigator, &scheduler);

        assert_eq!(controller.submit("ctaForm").await, SubmitOutcome::Invalid);
        assert!(submissions.all().is_empty());
        assert!(view.label_history.borrow().is_empty());
        assert_eq!(view.email_value(), "not-an-email");

        let message = view.message.borrow().clone().unwrap();
        assert_eq!(message.text, INVALID_EMAIL_MESSAGE);
        assert_eq!(message.kind, MessageKind::Error);

        scheduler.advance(5000);
        assert!(view.message.borrow().is_none());
    }

    #[tokio::test]
    async fn test_failed_submit_restores_control() {
        let scheduler = ManualScheduler::new();
        let view = FakeView::new("heroForm", "INITIATE_ACCESS", "user@example.com");
        let mut tracker = MockTracker::new();
        tracker.expect_track().never();
        let mut navigator = MockNavigator::new();
        navigator.expect_redirect().never();

        let (controller, _) =
            controller(view.clone(), Rc::new(FailingClient), tracker, navigator, &scheduler);

        assert_eq!(controller.submit("heroForm").await, SubmitOutcome::Failed);
        assert!(view.enabled.get());
        assert_eq!(view.submit_label(), "INITIATE_ACCESS");
        assert_eq!(view.email_value(), "user@example.com");
        assert_eq!(
            view.message.borrow().as_ref().map(|m| m.text.as_str()),
            Some(FAILURE_MESSAGE)
        );
        assert_eq!(controller.state("heroForm"), Some(FormState::Idle));
        scheduler.advance(10_000);
    }

    #[tokio::test]
    async fn test_storage_failure_fails_submission_before_sending() {
        let scheduler = ManualScheduler::new();
        let view = FakeView::new("heroForm", "INITIATE_ACCESS", "user@example.com");
        let mut tracker = MockTracker::new();
        tracker.expect_track().never();
        let mut navigator = MockNavigator::new();
        navigator.expect_redirect().never();
        let client = SimulatedSubmissionClient::new(Rc::new(scheduler.clone()), 500);

        let (controller, submissions) = controller_with_store(
            view.clone(),
            Rc::new(client),
            tracker,
            navigator,
            &scheduler,
            MemoryStore::with_quota(10),
        );

        assert_eq!(controller.submit("heroForm").await, SubmitOutcome::Failed);
        assert!(submissions.all().is_empty());
        assert!(scheduler.sleeps().is_empty());
        assert!(view.enabled.get());
        assert_eq!(view.submit_label(), "INITIATE_ACCESS");
        assert_eq!(
            view.message.borrow().as_ref().map(|m| (m.text.as_str(), m.kind)),
            Some((FAILURE_MESSAGE, MessageKind::Error))
        );
        assert_eq!(controller.state("heroForm"), Some(FormState::Idle));
        scheduler.advance(10_000);
    }

    struct GatedClient {
        gate: RefCell<Option<oneshot::Receiver<()>>>,
    }

    impl SubmissionClient for GatedClient {
        fn submit<'a>(
            &'a self,
            _submission: &'a Submission,
        ) -> LocalBoxFuture<'a, Result<(), SubmissionError>> {
            let gate = self.gate.borrow_mut().take();
            async move {
                if let Some(gate) = gate {
                    let _ = gate.await;
                }
                Ok(())
            }
            .boxed_local()
        }
    }

    #[tokio::test]
    async fn test_second_submit_while_in_flight_is_ignored() {
        let scheduler = ManualScheduler::new();
        let view = FakeView::new("heroForm", "INITIATE_ACCESS", "user@example.com");
        let mut tracker = MockTracker::new();
        tracker.expect_track().times(1).return_const(());
        let (release, gate) = oneshot::channel();
        let client = GatedClient {
            gate: RefCell::new(Some(gate)),
        };

        let (controller, submissions) =
            controller(view, Rc::new(client), tracker, MockNavigator::new(), &scheduler);
        let controller = &controller;

        let first = controller.submit("heroForm");
        let second = async move {
            let outcome = controller.submit("heroForm").await;
            let _ = release.send(());
            outcome
        };
        let (first, second) = futures::join!(first, second);

        assert_eq!(first, SubmitOutcome::Submitted);
        assert_eq!(second, SubmitOutcome::Busy);
        assert_eq!(submissions.all().len(), 1);
    }

    #[test]
    fn test_assign_id_keeps_ids_unique() {
        let mut registry = FormRegistry::new();
        assert_eq!(registry.assign_id("heroForm", 1), "heroForm");
        registry.register(FakeView::new("heroForm", "INITIATE_ACCESS", ""));

        let duplicate = registry.assign_id("heroForm", 2);
        assert_eq!(duplicate, "email-form-2");
        registry.register(FakeView::new(&duplicate, "SECURE_ALLOCATION", ""));

        assert_eq!(registry.assign_id("", 3), "email-form-3");
        registry.register(FakeView::new("email-form-3", "JOIN", ""));
        assert_eq!(registry.assign_id("email-form-3", 3), "email-form-3-2");

        assert_eq!(
            registry.ids(),
            vec!["heroForm".to_string(), "email-form-2".to_string(), "email-form-3".to_string()]
        );
    }

    #[tokio::test]
    async fn test_unknown_form_is_ignored() {
        let scheduler = ManualScheduler::new();
        let view = FakeView::new("heroForm", "INITIATE_ACCESS", "user@example.com");
        let (controller, submissions) = controller(
            view,
            Rc::new(OkClient),
            MockTracker::new(),
            MockNavigator::new(),
            &scheduler,
        );

        assert_eq!(controller.submit("footerForm").await, SubmitOutcome::UnknownForm);
        assert!(submissions.all().is_empty());
        assert_eq!(controller.form_ids(), vec!["heroForm".to_string()]);
    }
}
