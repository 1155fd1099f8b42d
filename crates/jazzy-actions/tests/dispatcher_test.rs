use async_trait::async_trait;
use jazzy_actions::{
    ActionContext, ActionDispatcher, ActionError, ActionHandler, DispatchReport,
};
use jazzy_types::{Action, ActionKind, Source};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Appends its label to a shared log, then behaves as configured.
struct Recorder {
    label: &'static str,
    log: Arc<Mutex<Vec<&'static str>>>,
    behaviour: Behaviour,
}

#[derive(Clone, Copy)]
enum Behaviour {
    Succeed,
    Fail,
    Panic,
    Hang,
}

#[async_trait]
impl ActionHandler for Recorder {
    async fn handle(&self, _action: &Action, _ctx: &ActionContext) -> Result<(), ActionError> {
        self.log.lock().unwrap().push(self.label);
        match self.behaviour {
            Behaviour::Succeed => Ok(()),
            Behaviour::Fail => Err(ActionError::Webhook("boom".to_string())),
            Behaviour::Panic => panic!("handler exploded"),
            Behaviour::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok(())
            }
        }
    }
}

fn recorder(
    label: &'static str,
    log: &Arc<Mutex<Vec<&'static str>>>,
    behaviour: Behaviour,
) -> Arc<Recorder> {
    Arc::new(Recorder {
        label,
        log: log.clone(),
        behaviour,
    })
}

fn ctx() -> ActionContext {
    ActionContext::new("my site is down!", Source::Chat)
}

#[tokio::test]
async fn test_failing_handler_does_not_stop_others() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let mut dispatcher = ActionDispatcher::new();
    dispatcher.register("first", recorder("first", &log, Behaviour::Succeed));
    dispatcher.register("broken", recorder("broken", &log, Behaviour::Fail));
    dispatcher.register("last", recorder("last", &log, Behaviour::Succeed));

    let actions = vec![
        Action::new("first", None),
        Action::new("broken", None),
        Action::new("last", None),
    ];
    let report = dispatcher.dispatch(&actions, &ctx()).await;

    assert_eq!(
        report,
        DispatchReport {
            executed: 2,
            failed: 1,
            skipped: 0
        }
    );
    assert_eq!(*log.lock().unwrap(), vec!["first", "broken", "last"]);
}

#[tokio::test]
async fn test_panicking_handler_is_contained() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let mut dispatcher = ActionDispatcher::new();
    dispatcher.register("explode", recorder("explode", &log, Behaviour::Panic));
    dispatcher.register("after", recorder("after", &log, Behaviour::Succeed));

    let actions = vec![Action::new("explode", None), Action::new("after", None)];
    let report = dispatcher.dispatch(&actions, &ctx()).await;

    assert_eq!(report.failed, 1);
    assert_eq!(report.executed, 1);
    assert_eq!(*log.lock().unwrap(), vec!["explode", "after"]);
}

#[tokio::test(start_paused = true)]
async fn test_slow_handler_times_out() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let mut dispatcher = ActionDispatcher::new().with_timeout(Duration::from_secs(2));
    dispatcher.register("slow", recorder("slow", &log, Behaviour::Hang));
    dispatcher.register("fast", recorder("fast", &log, Behaviour::Succeed));

    let actions = vec![Action::new("slow", None), Action::new("fast", None)];
    let report = dispatcher.dispatch(&actions, &ctx()).await;

    assert_eq!(report.failed, 1);
    assert_eq!(report.executed, 1);
}

#[tokio::test]
async fn test_unknown_and_none_are_skipped() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let mut dispatcher = ActionDispatcher::new();
    dispatcher.register("log_lead", recorder("lead", &log, Behaviour::Succeed));

    let actions = vec![
        Action::new(ActionKind::None, None),
        Action::new("teleport", None),
        Action::new(ActionKind::LogLead, None),
    ];
    let report = dispatcher.dispatch(&actions, &ctx()).await;

    assert_eq!(report.skipped, 2);
    assert_eq!(report.executed, 1);
    assert_eq!(*log.lock().unwrap(), vec!["lead"]);
}

#[tokio::test]
async fn test_each_action_runs_once_per_occurrence() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let mut dispatcher = ActionDispatcher::new();
    dispatcher.register("ping", recorder("ping", &log, Behaviour::Succeed));

    let actions = vec![Action::new("ping", None), Action::new("ping", None)];
    dispatcher.dispatch(&actions, &ctx()).await;

    assert_eq!(log.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn test_register_replaces_previous_handler() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let mut dispatcher = ActionDispatcher::new();
    assert!(dispatcher
        .register("mark_urgent", recorder("old", &log, Behaviour::Succeed))
        .is_none());
    assert!(dispatcher
        .register("mark_urgent", recorder("new", &log, Behaviour::Succeed))
        .is_some());

    dispatcher
        .dispatch(&[Action::new(ActionKind::MarkUrgent, None)], &ctx())
        .await;
    assert_eq!(*log.lock().unwrap(), vec!["new"]);
}

#[tokio::test]
async fn test_empty_action_list() {
    let dispatcher = ActionDispatcher::new();
    let report = dispatcher.dispatch(&[], &ctx()).await;
    assert_eq!(report, DispatchReport::default());
}
