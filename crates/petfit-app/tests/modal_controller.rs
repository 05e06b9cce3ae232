mod support;

use std::sync::Arc;
use std::time::Instant;

use petfit_app::modal::{
    LOGIN_REQUIRED_ALERT, MISSING_BREED_ALERT, MISSING_PHOTO_ALERT, NETWORK_FAILURE_ALERT,
};
use petfit_app::{
    FittingSettled, MessageTone, ModalEvent, ModalScreen, Rejection, StartOutcome,
};
use petfit_core::request::FittingInput;
use petfit_core::response::{DEFAULT_FAILURE_MESSAGE, FittingResult};

use support::{PERIOD, ScriptedLoader, controller, pet_page, photo, plain_page};

fn alerts(events: &[ModalEvent]) -> Vec<String> {
    events
        .iter()
        .filter_map(|event| match event {
            ModalEvent::Alert(message) => Some(message.clone()),
            _ => None,
        })
        .collect()
}

#[test]
fn open_picks_pet_select_when_page_has_pets() {
    let loader = Arc::new(ScriptedLoader::default());
    let mut modal = controller(pet_page(), loader);

    assert_eq!(modal.visible_region(), None);
    assert_eq!(modal.open(), ModalScreen::PetSelect);
    assert_eq!(modal.visible_region(), Some(ModalScreen::PetSelect));
    assert_eq!(
        modal.pets().current().selected_pet_id.as_deref(),
        Some("1")
    );
}

#[test]
fn open_falls_back_to_manual_upload_without_pets() {
    let loader = Arc::new(ScriptedLoader::default());
    let mut modal = controller(plain_page(), loader);

    assert_eq!(modal.open(), ModalScreen::ManualUpload);
    assert_eq!(
        modal.drain_events(),
        vec![ModalEvent::ScreenChanged(ModalScreen::ManualUpload)]
    );
}

#[test]
fn pet_without_photo_blocks_loading_until_photo_pet_selected() {
    let loader = Arc::new(ScriptedLoader::default());
    let mut modal = controller(pet_page(), loader.clone());
    modal.open();

    modal.select_pet("2").expect("select pet 2");
    assert!(modal.pets().warning_visible());

    let outcome = modal.start_profile(Instant::now());
    assert_eq!(outcome, StartOutcome::Rejected(Rejection::PetWithoutImage));
    assert_eq!(modal.screen(), ModalScreen::PetSelect);
    assert_eq!(loader.call_count(), 0);

    modal.select_pet("1").expect("select pet 1");
    assert!(!modal.pets().warning_visible());
    let outcome = modal.start_profile(Instant::now());
    assert!(matches!(outcome, StartOutcome::Submitted { .. }));
    assert_eq!(modal.screen(), ModalScreen::Loading);

    let requests = loader.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(
        requests[0].input,
        FittingInput::Profile {
            pet_id: "1".to_string()
        }
    );
    let product = requests[0].product.as_ref().expect("product context");
    assert_eq!(product.name, "Yellow Raincoat");
    assert_eq!(product.size.as_deref(), Some("M"));
}

#[test]
fn start_outside_pet_select_never_calls_client() {
    let loader = Arc::new(ScriptedLoader::default());
    let mut modal = controller(pet_page(), loader.clone());

    assert_eq!(modal.start_profile(Instant::now()), StartOutcome::Ignored);
    assert_eq!(modal.screen(), ModalScreen::Closed);
    assert_eq!(loader.call_count(), 0);
}

#[test]
fn manual_upload_validates_breed_then_photo() {
    let loader = Arc::new(ScriptedLoader::default());
    let mut modal = controller(plain_page(), loader.clone());
    modal.open();
    modal.drain_events();

    assert_eq!(
        modal.submit_manual(Instant::now()),
        StartOutcome::Rejected(Rejection::MissingBreed)
    );
    assert_eq!(alerts(&modal.drain_events()), vec![MISSING_BREED_ALERT]);

    modal.set_breed("  Maltese ");
    assert_eq!(
        modal.submit_manual(Instant::now()),
        StartOutcome::Rejected(Rejection::MissingPhoto)
    );
    assert_eq!(alerts(&modal.drain_events()), vec![MISSING_PHOTO_ALERT]);
    assert_eq!(modal.screen(), ModalScreen::ManualUpload);
    assert_eq!(loader.call_count(), 0);

    modal.set_photo(photo());
    modal.click_ai_size(0);
    assert!(matches!(
        modal.submit_manual(Instant::now()),
        StartOutcome::Submitted { .. }
    ));

    let request = &loader.requests()[0];
    assert!(request.product.is_none());
    match &request.input {
        FittingInput::Manual { breed, size, image } => {
            assert_eq!(breed, "Maltese");
            assert_eq!(size.as_deref(), Some("S"));
            assert_eq!(image.file_name, "dog.jpg");
        }
        other => panic!("unexpected input: {other:?}"),
    }
}

#[test]
fn manual_size_falls_back_to_product_size() {
    let loader = Arc::new(ScriptedLoader::default());
    let mut modal = controller(plain_page(), loader.clone());
    modal.open();
    modal.set_breed("Poodle");
    modal.set_photo(photo());
    modal.click_product_size(2);

    modal.submit_manual(Instant::now());

    match &loader.requests()[0].input {
        FittingInput::Manual { size, .. } => assert_eq!(size.as_deref(), Some("L")),
        other => panic!("unexpected input: {other:?}"),
    }
}

#[test]
fn size_pickers_stay_independent() {
    let loader = Arc::new(ScriptedLoader::default());
    let mut modal = controller(pet_page(), loader);

    modal.click_ai_size(0);
    assert_eq!(modal.product_size().value(), Some("M"));
    assert_eq!(
        modal.product_size().hidden().map(|hidden| hidden.value.as_str()),
        Some("M")
    );

    modal.click_product_size(2);
    assert_eq!(modal.ai_size().value(), Some("S"));
    assert_eq!(modal.effective_size().as_deref(), Some("S"));
}

#[test]
fn success_renders_one_image_and_success_message() {
    let loader = Arc::new(ScriptedLoader::default());
    let mut modal = controller(pet_page(), loader.clone());
    modal.open();
    let start = Instant::now();
    modal.start_profile(start);

    modal.on_tick(start + PERIOD * 3);
    let running = modal.progress();
    assert!(running.running);
    assert!(running.value <= 90);

    assert!(loader.respond(FittingResult::Success {
        result_image_url: Some("x.png".to_string()),
        message: "Done".to_string(),
    }));
    modal.on_tick(start + PERIOD * 4);

    assert_eq!(modal.screen(), ModalScreen::Result);
    let result = modal.result().expect("result content");
    assert_eq!(result.image_url.as_deref(), Some("x.png"));
    assert_eq!(result.message.text, "Done");
    assert_eq!(result.message.tone, MessageTone::Success);
    assert_eq!(result.elapsed, Some(PERIOD * 4));

    let progress = modal.progress();
    assert_eq!(progress.value, 100);
    assert!(!progress.running);
}

#[test]
fn no_image_returns_to_manual_upload_not_error() {
    let loader = Arc::new(ScriptedLoader::default());
    let mut modal = controller(pet_page(), loader.clone());
    modal.open();
    modal.start_profile(Instant::now());

    loader.respond(FittingResult::ImageRequired);
    modal.on_tick(Instant::now());

    assert_eq!(modal.screen(), ModalScreen::ManualUpload);
    assert!(modal.result().is_none());
}

#[test]
fn failure_without_message_uses_default_text() {
    let loader = Arc::new(ScriptedLoader::default());
    let mut modal = controller(plain_page(), loader.clone());
    modal.open();
    modal.set_breed("Shiba");
    modal.set_photo(photo());
    modal.submit_manual(Instant::now());

    loader.respond(FittingResult::Failure {
        result_image_url: None,
        message: None,
    });
    modal.on_tick(Instant::now());

    assert_eq!(modal.screen(), ModalScreen::ErrorDisplay);
    let result = modal.result().expect("error content");
    assert_eq!(result.image_url, None);
    assert_eq!(result.message.text, DEFAULT_FAILURE_MESSAGE);
    assert_eq!(result.message.tone, MessageTone::Error);

    modal.back_to_input();
    assert_eq!(modal.screen(), ModalScreen::ManualUpload);
    assert!(modal.result().is_none());
}

#[test]
fn transport_failure_alerts_once_and_returns_to_idle() {
    let loader = Arc::new(ScriptedLoader::default());
    let mut modal = controller(pet_page(), loader.clone());
    modal.open();
    modal.start_profile(Instant::now());
    modal.drain_events();

    loader.respond(FittingResult::NetworkFailure {
        reason: "connection refused".to_string(),
    });
    modal.on_tick(Instant::now());

    let events = modal.drain_events();
    assert_eq!(alerts(&events), vec![NETWORK_FAILURE_ALERT]);
    assert_eq!(modal.screen(), ModalScreen::PetSelect);
    assert!(modal.result().is_none());
}

#[test]
fn worker_hang_up_counts_as_transport_failure() {
    let loader = Arc::new(ScriptedLoader::default());
    let mut modal = controller(pet_page(), loader.clone());
    modal.open();
    modal.start_profile(Instant::now());
    modal.drain_events();

    loader.hang_up_last();
    modal.on_tick(Instant::now());

    assert_eq!(alerts(&modal.drain_events()), vec![NETWORK_FAILURE_ALERT]);
    assert_eq!(modal.screen(), ModalScreen::PetSelect);
}

#[test]
fn login_required_navigates_away_and_ends_session() {
    let loader = Arc::new(ScriptedLoader::default());
    let mut modal = controller(pet_page(), loader.clone());
    modal.open();
    modal.start_profile(Instant::now());
    modal.drain_events();

    loader.respond(FittingResult::AuthRequired);
    modal.on_tick(Instant::now());

    let events = modal.drain_events();
    assert_eq!(alerts(&events), vec![LOGIN_REQUIRED_ALERT]);
    assert!(events.contains(&ModalEvent::NavigateToLogin {
        url: "http://shop.test/login".to_string()
    }));
    assert_eq!(modal.screen(), ModalScreen::Closed);
    assert!(modal.session_ended());

    assert_eq!(modal.open(), ModalScreen::Closed);
}

#[test]
fn close_during_loading_stops_progress_and_drops_late_response() {
    let loader = Arc::new(ScriptedLoader::default());
    let mut modal = controller(pet_page(), loader.clone());
    modal.open();
    modal.start_profile(Instant::now());
    assert!(modal.progress().running);

    modal.close();
    assert_eq!(modal.screen(), ModalScreen::Closed);
    assert!(!modal.progress().running);
    assert_eq!(modal.active_token(), None);

    let delivered = loader.respond(FittingResult::Success {
        result_image_url: Some("late.png".to_string()),
        message: "late".to_string(),
    });
    assert!(!delivered);
    modal.on_tick(Instant::now());
    assert!(modal.result().is_none());
    assert_eq!(modal.screen(), ModalScreen::Closed);
}

#[test]
fn stale_token_is_ignored_during_a_fresh_interaction() {
    let loader = Arc::new(ScriptedLoader::default());
    let mut modal = controller(pet_page(), loader.clone());
    modal.open();
    modal.start_profile(Instant::now());
    modal.close();

    modal.open();
    modal.start_profile(Instant::now());
    let tokens = loader.tokens();
    assert_eq!(tokens.len(), 2);
    assert!(tokens[1] > tokens[0]);

    modal.apply_settled(
        FittingSettled {
            token: tokens[0],
            result: FittingResult::Failure {
                result_image_url: None,
                message: Some("stale".to_string()),
            },
        },
        Instant::now(),
    );
    assert_eq!(modal.screen(), ModalScreen::Loading);
    assert_eq!(modal.active_token(), Some(tokens[1]));
}

#[test]
fn reopen_keeps_pet_selection_but_not_screen_state() {
    let loader = Arc::new(ScriptedLoader::default());
    let mut modal = controller(pet_page(), loader.clone());
    modal.open();
    modal.select_pet("2").expect("select");
    modal.close();

    assert_eq!(modal.open(), ModalScreen::PetSelect);
    assert_eq!(
        modal.pets().current().selected_pet_id.as_deref(),
        Some("2")
    );
}

#[test]
fn reopen_starts_with_an_empty_manual_form() {
    let loader = Arc::new(ScriptedLoader::default());
    let mut modal = controller(plain_page(), loader.clone());
    modal.open();
    modal.set_breed("Maltese");
    modal.set_photo(photo());
    modal.close();

    assert_eq!(modal.open(), ModalScreen::ManualUpload);
    assert!(modal.form().breed.is_empty());
    assert!(modal.form().photo.is_none());
    assert_eq!(
        modal.submit_manual(Instant::now()),
        StartOutcome::Rejected(Rejection::MissingBreed)
    );
    assert_eq!(loader.call_count(), 0);
}

#[test]
fn product_context_carries_ai_size_over_product_size() {
    let loader = Arc::new(ScriptedLoader::default());
    let mut modal = controller(pet_page(), loader.clone());
    modal.open();
    modal.click_ai_size(2);
    modal.start_profile(Instant::now());

    let requests = loader.requests();
    let product = requests[0].product.as_ref().expect("product context");
    assert_eq!(product.size.as_deref(), Some("L"));
    assert_eq!(modal.product_size().value(), Some("M"));
}

#[test]
fn submissions_are_ignored_while_loading() {
    let loader = Arc::new(ScriptedLoader::default());
    let mut modal = controller(pet_page(), loader.clone());
    modal.open();
    modal.start_profile(Instant::now());

    assert_eq!(modal.start_profile(Instant::now()), StartOutcome::Ignored);
    assert_eq!(modal.submit_manual(Instant::now()), StartOutcome::Ignored);
    assert_eq!(loader.call_count(), 1);
}

#[test]
fn every_screen_change_clears_previous_result() {
    let loader = Arc::new(ScriptedLoader::default());
    let mut modal = controller(pet_page(), loader.clone());
    modal.open();
    modal.start_profile(Instant::now());
    loader.respond(FittingResult::Success {
        result_image_url: None,
        message: "ok".to_string(),
    });
    modal.on_tick(Instant::now());
    assert!(modal.result().is_some());

    modal.back_to_input();
    assert!(modal.result().is_none());

    modal.start_profile(Instant::now());
    loader.respond(FittingResult::Success {
        result_image_url: None,
        message: "again".to_string(),
    });
    modal.on_tick(Instant::now());
    modal.close();
    assert!(modal.result().is_none());
    assert_eq!(modal.progress().value, 0);
}
