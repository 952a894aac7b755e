#![expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use pretty_assertions::assert_eq;

use super::*;

#[test]
fn recording_backend_issues_fresh_handles() {
    let mut backend = RecordingBackend::new();
    let form = backend.create_backend("FORM", None).unwrap();
    let button = backend.create_backend("PUSHBUTTON", Some(form)).unwrap();
    assert_ne!(form, button);
    assert_eq!(
        backend.transcript(),
        vec!["create #1 FORM", "create #2 PUSHBUTTON in #1"]
    );
}

#[test]
fn clones_share_the_log() {
    let observer = RecordingBackend::new();
    let mut backend = observer.clone();
    let handle = backend.create_backend("FORM", None).unwrap();
    backend.show(handle, true).unwrap();
    backend.create_file("notes.prg").unwrap();

    assert_eq!(
        observer.calls(),
        vec![
            BackendCall::Create {
                handle,
                base_class: "FORM".to_string(),
                parent: None,
            },
            BackendCall::Show {
                handle,
                modal: true
            },
            BackendCall::CreateFile {
                path: "notes.prg".to_string()
            },
        ]
    );
}

#[test]
fn property_values_render() {
    let geometry = PropertyValue::Geometry {
        left: 10.0,
        top: 20.0,
        width: 100.0,
        height: 50.5,
    };
    assert_eq!(geometry.to_string(), "10,20 100x50.5");
    assert_eq!(PropertyValue::Text("Hi".into()).to_string(), "\"Hi\"");

    let font = FontValue {
        bold: true,
        underline: true,
        ..FontValue::default()
    };
    assert_eq!(
        PropertyValue::Font(font).to_string(),
        "\"Arial\" 10 bold underline"
    );
}

#[test]
fn event_calls_render() {
    let mut backend = RecordingBackend::new();
    let handle = backend.create_backend("PUSHBUTTON", None).unwrap();
    backend.bind_event(handle, "ONCLICK").unwrap();
    backend.unbind_event(handle, "ONCLICK").unwrap();
    assert_eq!(
        backend.transcript(),
        vec!["create #1 PUSHBUTTON", "bind #1 ONCLICK", "unbind #1 ONCLICK"]
    );
}

#[test]
fn null_backend_has_no_effects() {
    let mut backend = NullBackend::new();
    let a = backend.create_backend("FORM", None).unwrap();
    let b = backend.create_backend("FORM", None).unwrap();
    assert_ne!(a, b);
    assert!(backend.show(a, false).is_ok());
}
