use deskform::{FieldDescriptor, FormBuilder, FormItem, LayoutDirection, Rule, Schema, SelectOption};
use deskform_html::{HtmlOptions, to_html};

fn main() -> anyhow::Result<()> {
    let items: Vec<FormItem<String>> = vec![
        FieldDescriptor::select(
            "type",
            "Equipment or tool type",
            vec![SelectOption::new(1, "Drill"), SelectOption::new(2, "Scaffold")],
        )
        .required()
        .into(),
        FieldDescriptor::textarea("reference", "Reference or condition notes")
            .required()
            .into(),
    ];
    let schema = Schema::new()
        .field("type", Rule::number().required("Pick a type"))
        .field("reference", Rule::string().required("Describe the item"));

    let mut form = FormBuilder::new(items, schema, |values| println!("{values:?}"))
        .layout_direction(LayoutDirection::Column)
        .build()?;

    // Show the error lines a rejected submit produces.
    form.submit();

    let html = to_html(&form, &HtmlOptions::new().with_title("Add equipment"));
    println!("{html}");
    Ok(())
}
