//! Integration tests for deskform

use std::cell::RefCell;
use std::rc::Rc;

use deskform::{
    Capture, ErrorLine, FieldDescriptor, Form, FormBuilder, FormDriver, FormItem, FormValues,
    LayoutDirection, NoValidation, PLACEHOLDER_GLYPH, RenderItem, Rule, Schema, SelectOption,
    SubmitAffordance, SubmitOutcome,
};

fn equipment_fields() -> Vec<FieldDescriptor> {
    vec![
        FieldDescriptor::select("type", "Equipment type", vec![SelectOption::new(1, "Drill")])
            .required(),
        FieldDescriptor::textarea("reference", "Reference").required(),
    ]
}

fn equipment_schema() -> Schema {
    Schema::new()
        .field("type", Rule::number().required("Pick a type"))
        .field("reference", Rule::string().required("Describe the item"))
}

#[test]
fn test_empty_submit_without_required_fields() {
    let submitted = Capture::new();
    let fields = vec![
        FieldDescriptor::text("name", "Name"),
        FieldDescriptor::textarea("notes", "Notes"),
        FieldDescriptor::text("phone", "Phone").hidden(),
    ];
    let schema = Schema::new()
        .field("name", Rule::string())
        .field("phone", Rule::string());
    let mut form: Form = FormBuilder::from_fields(fields, schema, submitted.submit_handler())
        .build()
        .unwrap();

    assert_eq!(form.submit(), SubmitOutcome::Submitted);

    assert_eq!(submitted.count(), 1);
    let payload = submitted.last().unwrap();
    let names: Vec<_> = payload.names().map(|n| n.as_str().to_string()).collect();
    assert_eq!(names, vec!["name", "notes", "phone"]);
}

#[test]
fn test_required_field_left_empty_blocks_submit() {
    let submitted = Capture::new();
    let mut form: Form =
        FormBuilder::from_fields(equipment_fields(), equipment_schema(), submitted.submit_handler())
            .build()
            .unwrap();

    let outcome = FormDriver::new()
        .with_value("reference", "Bosch")
        .run(&mut form)
        .unwrap();

    assert!(matches!(outcome, SubmitOutcome::Rejected { ref errors } if errors.contains("type")));
    assert_eq!(submitted.count(), 0);
    assert_eq!(form.error("type"), Some("Pick a type"));

    let rendered = form.render();
    let view = rendered.field("type").unwrap();
    assert_eq!(view.error(), &ErrorLine::Message("Pick a type"));
}

#[test]
fn test_equipment_scenario() {
    let submitted = Capture::new();
    let mut form: Form =
        FormBuilder::from_fields(equipment_fields(), equipment_schema(), submitted.submit_handler())
            .build()
            .unwrap();

    assert!(!form.submit().is_submitted());
    assert_eq!(submitted.count(), 0);
    assert!(form.error("type").is_some());

    let outcome = FormDriver::new()
        .with_value("type", "1")
        .with_value("reference", "X")
        .run(&mut form)
        .unwrap();

    assert_eq!(outcome, SubmitOutcome::Submitted);
    assert_eq!(submitted.count(), 1);
    let expected: FormValues = [("type", "1"), ("reference", "X")].into_iter().collect();
    assert_eq!(submitted.last().unwrap(), expected);

    // State is not cleared after a successful submit.
    assert_eq!(form.value("reference"), Some("X"));
}

#[test]
fn test_hidden_field_keeps_value() {
    let mut form: Form = FormBuilder::from_fields(equipment_fields(), NoValidation, |_| {})
        .build()
        .unwrap();
    form.set_value("reference", "Ladder").unwrap();

    form.set_visible("reference", false).unwrap();

    let rendered = form.render();
    assert!(rendered.field("reference").is_none());
    assert_eq!(rendered.fields().count(), 1);
    assert_eq!(form.value("reference"), Some("Ladder"));

    form.set_visible("reference", true).unwrap();
    assert_eq!(form.render().field("reference").unwrap().value(), "Ladder");
}

#[test]
fn test_hidden_required_field_is_never_satisfiable() {
    let fields = vec![
        FieldDescriptor::text("name", "Name"),
        FieldDescriptor::select("status", "Status", vec![SelectOption::new(1, "OK")]).hidden(),
    ];
    let schema = Schema::new().field("status", Rule::number().required("Pick a status"));
    let submitted = Capture::new();
    let mut form: Form = FormBuilder::from_fields(fields, schema, submitted.submit_handler())
        .build()
        .unwrap();

    FormDriver::new().with_value("name", "x").run(&mut form).unwrap();

    assert_eq!(submitted.count(), 0);
    assert_eq!(form.error("status"), Some("Pick a status"));
    assert!(form.render().field("status").is_none());
}

#[test]
fn test_watch_fires_once_per_change_before_submit() {
    let log: Rc<RefCell<Vec<String>>> = Rc::default();
    let watch_log = Rc::clone(&log);
    let submit_log = Rc::clone(&log);

    let mut form: Form = FormBuilder::from_fields(
        equipment_fields(),
        equipment_schema(),
        move |_| submit_log.borrow_mut().push("submit".to_string()),
    )
    .on_values_change(move |values| {
        watch_log.borrow_mut().push(format!(
            "watch type={} reference={}",
            values.get("type").unwrap_or_default(),
            values.get("reference").unwrap_or_default()
        ))
    })
    .build()
    .unwrap();

    form.set_value("type", "1").unwrap();
    form.set_value("type", "1").unwrap();
    form.set_value("reference", "X").unwrap();
    form.submit();

    assert_eq!(
        *log.borrow(),
        vec![
            "watch type=1 reference=".to_string(),
            "watch type=1 reference=X".to_string(),
            "submit".to_string(),
        ]
    );
}

#[test]
fn test_default_values_visible_before_interaction() {
    let defaults: FormValues = [("type", "1"), ("reference", "Scaffold")].into_iter().collect();
    let watched = Capture::new();
    let form: Form = FormBuilder::from_fields(equipment_fields(), equipment_schema(), |_| {})
        .default_values(defaults.clone())
        .on_values_change(watched.watch_handler())
        .build()
        .unwrap();

    assert_eq!(form.values(), &defaults);
    assert_eq!(watched.count(), 0);
    assert!(form.errors().is_empty());
}

#[test]
fn test_render_wraps_fields_and_passes_custom_elements() {
    let items: Vec<FormItem<&str>> = vec![
        FormItem::Field(FieldDescriptor::text("name", "Name").required()),
        FormItem::Custom("<hr>"),
        FormItem::Field(FieldDescriptor::text("phone", "")),
    ];
    let form = FormBuilder::without_validation(items, |_| {})
        .layout_direction(LayoutDirection::Column)
        .build()
        .unwrap();

    let rendered = form.render();
    assert_eq!(rendered.direction, LayoutDirection::Column);
    assert_eq!(rendered.items.len(), 3);

    match &rendered.items[0] {
        RenderItem::Field(view) => {
            assert!(view.is_required());
            assert_eq!(view.error().text(), PLACEHOLDER_GLYPH);
        }
        RenderItem::Custom(_) => panic!("Expected field"),
    }
    assert!(matches!(rendered.items[1], RenderItem::Custom(&"<hr>")));
    match &rendered.items[2] {
        RenderItem::Field(view) => assert_eq!(view.label(), "Phone"),
        RenderItem::Custom(_) => panic!("Expected field"),
    }
    assert!(matches!(rendered.submit, SubmitAffordance::Default { label: "Continue" }));
}

#[test]
fn test_children_replace_button_but_not_gating() {
    let submitted = Capture::new();
    let items = equipment_fields().into_iter().map(FormItem::Field).collect();
    let mut form = FormBuilder::new(items, equipment_schema(), submitted.submit_handler())
        .children(vec!["<button>Save</button>"])
        .build()
        .unwrap();

    assert!(matches!(form.render().submit, SubmitAffordance::Children(children) if children.len() == 1));

    // Whatever triggers it, submission goes through the same gate.
    assert!(!form.submit().is_submitted());
    assert_eq!(submitted.count(), 0);
}
