//! Dialog state machine transitions.

use crate::conversation::domain::{DescriptionInput, DialogError, DialogPhase, DialogSession};
use crate::task::domain::TaskDomainError;
use eyre::ensure;
use rstest::rstest;

#[rstest]
fn title_then_description_completes_the_draft() -> eyre::Result<()> {
    let session = DialogSession::start().submit_title("  Обновить зависимости ")?;
    ensure!(session.phase() == DialogPhase::AwaitingDescription);
    ensure!(session.title() == Some("Обновить зависимости"));

    let draft = session.complete(DescriptionInput::Text("cargo update и прогон CI".to_owned()))?;

    ensure!(draft.title == "Обновить зависимости");
    ensure!(draft.description.as_deref() == Some("cargo update и прогон CI"));
    Ok(())
}

#[rstest]
#[case(DescriptionInput::Skip)]
#[case(DescriptionInput::Text("   ".to_owned()))]
fn skipped_or_blank_description_is_absent(#[case] input: DescriptionInput) -> eyre::Result<()> {
    let draft = DialogSession::start()
        .submit_title("Написать тесты")?
        .complete(input)?;
    ensure!(draft.description.is_none());
    Ok(())
}

#[rstest]
fn blank_title_is_rejected() {
    let result = DialogSession::start().submit_title("   ");
    assert_eq!(
        result,
        Err(DialogError::InvalidTitle(TaskDomainError::EmptyTitle))
    );
}

#[rstest]
fn over_long_title_reports_its_length() {
    let result = DialogSession::start().submit_title(&"я".repeat(256));
    assert!(matches!(
        result,
        Err(DialogError::InvalidTitle(TaskDomainError::TitleTooLong { length: 256, .. }))
    ));
}

#[rstest]
fn description_step_without_title_reports_missing_scratch() {
    let session = DialogSession::from_parts(DialogPhase::AwaitingDescription, None);
    assert_eq!(
        session.complete(DescriptionInput::Skip),
        Err(DialogError::MissingScratch)
    );
}

#[rstest]
fn inputs_out_of_phase_are_refused() {
    let awaiting_title = DialogSession::start();
    assert_eq!(
        awaiting_title.complete(DescriptionInput::Skip),
        Err(DialogError::OutOfPhase(DialogPhase::AwaitingTitle))
    );

    let idle = DialogSession::default();
    assert_eq!(
        idle.submit_title("Заголовок"),
        Err(DialogError::OutOfPhase(DialogPhase::Idle))
    );
}
