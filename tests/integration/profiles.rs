use tempfile::tempdir;

use flex_support_cli::{
    api::Credentials,
    cli::{CommandRequest, ProfileSelection, ProfilesAction},
    config::{ProfileRecord, StoredProfile},
    lib::errors::CliError,
    runtime::Outcome,
};

use crate::common::{dispatch, store_in, MockFactory, SERVICE_SID};

#[test]
fn create_profile_verifies_then_saves() {
    let dir = tempdir().expect("can create temporary directory");
    let store = store_in(dir.path());
    let factory = MockFactory::default();

    let run = dispatch(
        &store,
        &factory,
        &["ops", "AC123", "auth-token", "WS999"],
        dir.path().to_path_buf(),
        &ProfileSelection::guest(None),
        &CommandRequest::Profiles(ProfilesAction::Create),
    );

    match run.result {
        Ok(Outcome::ProfileSaved { name }) => assert_eq!(name, "ops"),
        other => panic!("Unexpected outcome: {other:?}"),
    }
    assert_eq!(
        run.asked,
        [
            "Profile name",
            "Account SID (username)",
            "Auth token (password)",
            "TaskRouter workspace SID",
        ]
    );
    assert_eq!(
        factory.connected_with(),
        vec![Credentials::Basic {
            username: "AC123".into(),
            password: "auth-token".into(),
        }]
    );

    match store.load_profile("ops").expect("profile loads") {
        StoredProfile::Named(record) => assert_eq!(
            record,
            ProfileRecord {
                username: Some("AC123".into()),
                password: Some("auth-token".into()),
                workspace_sid: Some("WS999".into()),
                service_sid: Some(SERVICE_SID.into()),
                ..ProfileRecord::default()
            }
        ),
        other => panic!("Unexpected stored profile: {other:?}"),
    }
}

#[test]
fn rejected_credentials_leave_store_untouched() {
    let dir = tempdir().expect("can create temporary directory");
    let store = store_in(dir.path());
    let factory = MockFactory::rejecting(Credentials::Basic {
        username: "AC123".into(),
        password: "wrong".into(),
    });

    let run = dispatch(
        &store,
        &factory,
        &["ops", "AC123", "wrong", "WS999"],
        dir.path().to_path_buf(),
        &ProfileSelection::guest(None),
        &CommandRequest::Profiles(ProfilesAction::Create),
    );

    match run.result {
        Err(CliError::ExternalService { source }) => assert!(source.is_unauthorized()),
        other => panic!("Unexpected result: {other:?}"),
    }
    assert_eq!(run.asked.len(), 3, "workspace is only asked after verification");
    assert!(!store.path().exists());
    assert!(store.list_profiles().expect("list succeeds").is_empty());
}

#[test]
fn blank_credentials_are_rejected_before_any_request() {
    let dir = tempdir().expect("can create temporary directory");
    let store = store_in(dir.path());
    let factory = MockFactory::default();

    let run = dispatch(
        &store,
        &factory,
        &["ops", "AC123", "   "],
        dir.path().to_path_buf(),
        &ProfileSelection::guest(None),
        &CommandRequest::Profiles(ProfilesAction::Create),
    );

    match run.result {
        Err(CliError::MissingCredentials { profile, .. }) => assert_eq!(profile, "ops"),
        other => panic!("Unexpected result: {other:?}"),
    }
    assert!(factory.connected_with().is_empty());
    assert!(!store.path().exists());
}

#[test]
fn list_profiles_reports_sorted_names() {
    let dir = tempdir().expect("can create temporary directory");
    let store = store_in(dir.path());
    let factory = MockFactory::default();

    let empty = dispatch(
        &store,
        &factory,
        &[],
        dir.path().to_path_buf(),
        &ProfileSelection::guest(None),
        &CommandRequest::Profiles(ProfilesAction::List),
    );
    match empty.result {
        Ok(Outcome::ProfilesListed(names)) => assert!(names.is_empty()),
        other => panic!("Unexpected outcome: {other:?}"),
    }
    assert!(empty.lines[0].starts_with("No profiles found"), "{:?}", empty.lines);

    for name in ["zulu", "alpha"] {
        store
            .save_profile(
                name,
                &ProfileRecord {
                    token: Some("t".into()),
                    ..ProfileRecord::default()
                },
            )
            .expect("profile saves");
    }

    let listed = dispatch(
        &store,
        &factory,
        &[],
        dir.path().to_path_buf(),
        &ProfileSelection::named("ignored"),
        &CommandRequest::Profiles(ProfilesAction::List),
    );
    match listed.result {
        Ok(Outcome::ProfilesListed(names)) => assert_eq!(names, ["alpha", "zulu"]),
        other => panic!("Unexpected outcome: {other:?}"),
    }
    assert_eq!(listed.lines, ["alpha", "zulu"]);
    assert!(factory.connected_with().is_empty());
}
