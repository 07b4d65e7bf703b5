//! Integration tests for birdability

use birdability::{
    ControlSet, ExternalTransform, FieldPath, FileStorage, FormSurface, LeafValue, MAX_PHOTOS,
    MemoryStorage, Navigation, PhotoError, PhotoFile, Revision, Session, Survey123Mapper,
    TriState, codec, report, schema,
};

fn checklist() -> ControlSet {
    ControlSet::for_schema(schema())
}

fn jpeg(name: &str) -> PhotoFile {
    PhotoFile::new(name, "image/jpeg", vec![0xff, 0xd8, 0xff, 0xe0])
}

#[test]
fn test_assign_then_resolve() -> anyhow::Result<()> {
    let mut tree = schema().default_tree();
    let path = FieldPath::new("accessibilityDetailed.gates.swingKissingGate");

    tree.assign(&path, Some(LeafValue::Bool(true)))?;
    assert_eq!(tree.resolve(&path), Some(&LeafValue::Bool(true)));

    let before = tree.clone();
    tree.assign(&path, None)?;
    assert_eq!(tree, before);
    Ok(())
}

#[test]
fn test_capture_restore_capture_over_full_checklist() {
    let mut session = Session::new(MemoryStorage::new());
    let mut form = checklist();
    form.set_value("name", "Heron Marsh");
    form.set_value("generalInformation.locationName", "Heron Marsh");
    form.select("generalInformation.trailType", "lollipop");
    form.select("generalInformation.goodCarBirding", "true");
    form.select("accessibilityDetailed.birdBlinds.hasBirdBlinds", "true");
    form.set_checked("accessibilityDetailed.birdBlinds.roofProvidesShade", true);
    form.set_value("accessibilityDetailed.birdBlinds.comments", "Two blinds");
    form.select("finalThoughts.overallRating", "5");

    let first = session.capture(&form);
    let mut fresh = checklist();
    codec::restore(&mut fresh, &first);
    let second = session.capture(&fresh);

    assert_eq!(first, second);
    assert_eq!(fresh, form);
    session.navigate(&fresh, Navigation::Finish).unwrap();
}

#[test]
fn test_ninth_photo_rejected() {
    let mut session = Session::new(MemoryStorage::new());
    let form = checklist();

    let files: Vec<PhotoFile> = (0..MAX_PHOTOS).map(|i| jpeg(&format!("{i}.jpg"))).collect();
    let report = session.attach_photos(&form, files).unwrap();
    assert_eq!(report.attached.len(), 8);
    let before = session.photos().records().to_vec();

    let report = session.attach_photos(&form, [jpeg("ninth.jpg")]).unwrap();
    assert!(report.attached.is_empty());
    assert_eq!(report.rejected[0].1, PhotoError::LimitReached { limit: 8 });
    assert_eq!(session.photos().records(), before.as_slice());
}

#[test]
fn test_gate_no_suppresses_details_in_url() {
    let session = Session::new(MemoryStorage::new());
    let mut form = checklist();
    form.select("accessibilityDetailed.parking.hasParking", "false");
    form.set_checked("accessibilityDetailed.parking.pullOffAreas", true);
    form.set_checked("accessibilityDetailed.parking.vanAccessible", true);

    let params = session.survey123_parameters(&form);
    assert_eq!(
        params
            .get("birding_location_accessibility_/is_there_parking")
            .map(|v| v.as_str()),
        Some("No")
    );
    assert!(!params.keys().any(|k| k.contains("parking_info")));

    let url = session.survey123_url(&form).unwrap();
    assert!(url.as_str().contains("field%3Ais_there_parking=No"));
    assert!(!url.as_str().contains("pull_off"));
}

#[test]
fn test_latitude_without_longitude_has_no_point() {
    let session = Session::new(MemoryStorage::new());
    let mut form = checklist();
    form.set_value("generalInformation.latitude", "40.7128");

    let params = session.survey123_parameters(&form);
    assert!(!params.contains_key("general_information/point"));
}

#[test]
fn test_import_keeps_session_identity() -> anyhow::Result<()> {
    let mut session = Session::new(MemoryStorage::new());
    let mut form = checklist();
    let blank = form.clone();

    let imported = session.import_report(
        &mut form,
        r#"{"id":"FILE-ID","createdAt":"2020-01-01T00:00:00.000Z","generalInformation":{"locationName":"Test Park"}}"#,
    )?;
    assert_eq!(imported.id(), Some("FILE-ID"));

    let changed: Vec<&str> = form
        .controls()
        .iter()
        .zip(blank.controls())
        .filter(|(now, before)| now != before)
        .map(|(now, _)| now.name.as_str())
        .collect();
    assert_eq!(changed, ["generalInformation.locationName"]);

    let exported = session.export_report(&form)?;
    let value: serde_json::Value = serde_json::from_str(&exported.contents)?;
    assert_eq!(value["id"], session.identity().id_string());
    assert_ne!(value["createdAt"], "2020-01-01T00:00:00.000Z");
    assert_eq!(value["generalInformation"]["locationName"], "Test Park");
    Ok(())
}

#[test]
fn test_identity_policy() {
    let mut session = Session::new(MemoryStorage::new());
    let mut form = checklist();

    let a = session.export_report(&form).unwrap();
    let b = session.export_report(&form).unwrap();
    let id = |contents: &str| -> serde_json::Value {
        let value: serde_json::Value = serde_json::from_str(contents).unwrap();
        serde_json::json!([value["id"], value["createdAt"]])
    };
    assert_eq!(id(&a.contents), id(&b.contents));

    let other = Session::new(MemoryStorage::new());
    assert_ne!(other.identity().id(), session.identity().id());

    let old = session.identity().id();
    session.clear(&mut form).unwrap();
    assert_ne!(session.identity().id(), old);
}

#[test]
fn test_export_document_layout() -> anyhow::Result<()> {
    let mut session = Session::new(MemoryStorage::new());
    let mut form = checklist();
    form.set_value("name", "Cape May Point");
    session.attach_photos(&form, [jpeg("blind.jpg")])?;

    let exported = session.export_report(&form)?;
    assert_eq!(exported.filename, "cape_may_point.json");

    let value: serde_json::Value = serde_json::from_str(&exported.contents)?;
    for key in [
        "id",
        "createdAt",
        "name",
        "generalInformation",
        "accessibilityDetailed",
        "accessibilityCriteria",
        "finalThoughts",
        "contactInformation",
        "photos",
    ] {
        assert!(value.get(key).is_some(), "missing {key}");
    }
    assert_eq!(value["photos"][0]["name"], "blind.jpg");
    assert_eq!(value["photos"][0]["size"], 4);
    assert!(value["photos"][0].get("dataUrl").is_none());
    assert_eq!(value["generalInformation"]["trailLoop"], false);
    assert_eq!(
        value["accessibilityDetailed"]["parking"]["hasParking"],
        ""
    );
    Ok(())
}

#[test]
fn test_drafts_survive_a_restart_on_disk() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;

    let mut session = Session::new(FileStorage::open(dir.path())?);
    let mut form = checklist();
    form.set_value("generalInformation.trailName", "Boardwalk");
    form.select("accessibilityDetailed.steps.present", "true");
    session.attach_photos(&form, [jpeg("steps.jpg")])?;
    session.navigate(&form, Navigation::Jump(7))?;

    let mut restarted = Session::new(FileStorage::open(dir.path())?);
    let mut fresh = checklist();
    assert!(restarted.resume(&mut fresh));
    assert_eq!(fresh.value_of("generalInformation.trailName"), Some("Boardwalk"));
    assert_eq!(fresh.selected("accessibilityDetailed.steps.present"), Some("true"));
    assert_eq!(restarted.photos().len(), 1);
    assert!(restarted.has_unsaved_content(&fresh));
    Ok(())
}

#[test]
fn test_revisions_share_mapping() {
    let mut form = checklist();
    form.select("accessibilityDetailed.ramps.hasRamps", "true");
    form.set_checked("accessibilityDetailed.ramps.handrails", true);
    let tree = Session::new(MemoryStorage::new()).capture(&form);

    let v1 = Survey123Mapper::new(Revision::V1);
    let v2 = Survey123Mapper::new(Revision::V2);
    assert_eq!(v1.transform(&tree), v2.transform(&tree));

    let v1_url = v1.request_for(&tree).unwrap();
    let v2_url = v2.request_for(&tree).unwrap();
    assert!(
        v1_url
            .as_str()
            .contains("field%3Abirding_location_accessibility_%2Framps_info%2Fhandrails=Yes")
    );
    assert!(v2_url.as_str().contains("field%3Ahandrails=Yes"));
}

#[test]
fn test_legacy_report_gates_are_read() -> anyhow::Result<()> {
    let imported = report::parse_report(
        r#"{"accessibilityDetailed":{"benches":{"hasBenches":true,"benchesWithArmrests":"true"}}}"#,
    )?;
    assert_eq!(
        imported
            .tree
            .get_tri_state(&"accessibilityDetailed.benches.hasBenches".into())?,
        TriState::Yes
    );
    assert!(
        imported
            .tree
            .get_bool(&"accessibilityDetailed.benches.benchesWithArmrests".into())?
    );
    Ok(())
}

#[test]
fn test_legacy_top_level_answers_reach_survey123() -> anyhow::Result<()> {
    let imported = report::parse_report(
        r#"{
            "finalThoughts": "Smooth path to the hide",
            "overallRating": "5",
            "photoPermissions": true,
            "contactEmail": "guide@example.org",
            "eventCode": "SPRING"
        }"#,
    )?;

    let params = Survey123Mapper::new(Revision::V1).transform(&imported.tree);
    let value = |key: &str| params.get(key).map(|v| v.as_str().to_string());

    assert_eq!(
        value("final_thoughts/final_comments").as_deref(),
        Some("Smooth path to the hide")
    );
    assert_eq!(value("final_thoughts/rating").as_deref(), Some("5"));
    assert_eq!(value("final_thoughts/photos_permissions").as_deref(), Some("Yes"));
    assert_eq!(
        value("contact_information_optional/email_address").as_deref(),
        Some("guide@example.org")
    );
    assert_eq!(value("event_code").as_deref(), Some("SPRING"));
    Ok(())
}
