use tablecloth_testkit::{
    TempOutput, cell_value, conditional_formats, data_validations, header_row, open_xlsx,
    sheet_names, trees_package,
};
use tablecloth_workbook::{
    Backend, ErrorType, TemplateOptions, TemplatePlan, TemplateWriter, XlsxWriter,
};

fn plan(options: &TemplateOptions) -> TemplatePlan {
    TemplatePlan::build(&trees_package(), options, Backend::Excel).unwrap()
}

#[test]
fn writes_tables_and_enum_sheet() {
    let out = TempOutput::new("template.xlsx");
    XlsxWriter
        .save(&plan(&TemplateOptions::default()), out.path())
        .unwrap();

    let book = open_xlsx(&out.path());
    assert_eq!(sheet_names(&book), ["tree", "branch", "lists"]);
    assert_eq!(header_row(&book, "tree"), ["id", "name", "type"]);
    assert_eq!(header_row(&book, "branch"), ["tree_id", "attached"]);
    assert_eq!(cell_value(&book, "lists", "A1").as_deref(), Some("deciduous"));
    assert_eq!(cell_value(&book, "lists", "A2").as_deref(), Some("evergreen"));
}

#[test]
fn writes_validations_and_conditional_formats() {
    let out = TempOutput::new("rules.xlsx");
    XlsxWriter
        .save(&plan(&TemplateOptions::default()), out.path())
        .unwrap();
    let book = open_xlsx(&out.path());

    let validations = data_validations(&book, "branch");
    assert_eq!(validations.len(), 2, "{validations:?}");
    let (sqref, formula) = &validations[0];
    assert_eq!(sqref, "A2:A1048576");
    assert!(formula.contains("'tree'!$A$2:$A$1048576"), "{formula}");

    let formats = conditional_formats(&book, "branch");
    assert_eq!(formats.len(), 2, "{formats:?}");
    let (sqref, formula) = &formats[0];
    assert_eq!(sqref, "A2:A1048576");
    assert!(formula.contains("INT(A2) <> A2"), "{formula}");
    assert!(
        formula.contains("ISNA(MATCH(A2, 'tree'!$A$2:$A$1048576, 0))"),
        "{formula}"
    );
}

#[test]
fn enum_sheet_is_omitted_without_rules() {
    let options = TemplateOptions {
        dropdowns: false,
        invalid_fill: None,
        ..TemplateOptions::default()
    };
    let out = TempOutput::new("bare.xlsx");
    XlsxWriter.save(&plan(&options), out.path()).unwrap();
    assert_eq!(sheet_names(&open_xlsx(&out.path())), ["tree", "branch"]);
}

#[test]
fn writes_every_option_combination() {
    let variants = [
        TemplateOptions {
            error_type: Some(ErrorType::Information),
            ..TemplateOptions::default()
        },
        TemplateOptions {
            error_type: Some(ErrorType::Stop),
            validate_foreign_keys: false,
            ..TemplateOptions::default()
        },
        TemplateOptions {
            hide_columns: true,
            header_height: Some(30.0),
            freeze_header: false,
            ..TemplateOptions::default()
        },
        TemplateOptions {
            describe_headers: true,
            header_fill: None,
            header_bold: false,
            ..TemplateOptions::default()
        },
    ];
    for options in variants {
        let bytes = XlsxWriter.to_bytes(&plan(&options)).unwrap();
        assert!(bytes.starts_with(b"PK"), "{options:?}");
    }
}

#[test]
fn writes_directly_from_package() {
    let mut workbook = XlsxWriter
        .write_package(&trees_package(), &TemplateOptions::default())
        .unwrap();
    let bytes = workbook.save_to_buffer().unwrap();
    assert!(!bytes.is_empty());
}
