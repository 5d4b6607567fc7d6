use anyhow::Result;
use pp2bw_migrate::{
    export::bitwarden::{CustomField, ItemData, ItemType, UriMatch},
    import::csv::{
        passwords_plus::{parse_path, PasswordsPlusCsv},
        MapperOptions,
    },
    Convert, Error,
};
use pp2bw_unit_tests::fixture;

#[tokio::test]
async fn passwords_plus_csv_parse() -> Result<()> {
    let rows = parse_path(fixture("passwords-plus-export.csv")).await?;
    assert_eq!(17, rows.header.columns().len());
    assert_eq!(6, rows.rows.len());

    let lines: Vec<u64> = rows.rows.iter().map(|r| r.line).collect();
    assert_eq!(vec![2, 3, 4, 5, 7, 8], lines);
    assert_eq!(Some("dear diary\nsecond line"), rows.rows[3].get(11));
    Ok(())
}

#[tokio::test]
async fn passwords_plus_csv_convert() -> Result<()> {
    let conversion = PasswordsPlusCsv::default()
        .convert(fixture("passwords-plus-export.csv"))
        .await?;

    let items = conversion.export.items();
    let names: Vec<&str> = items.iter().map(|i| i.name()).collect();
    assert_eq!(vec!["Gmail", "Visa", "Me", "Diary", "Work VPN"], names);
    let kinds: Vec<ItemType> = items.iter().map(|i| i.kind()).collect();
    assert_eq!(
        vec![
            ItemType::Login,
            ItemType::Card,
            ItemType::Identity,
            ItemType::SecureNote,
            ItemType::Login,
        ],
        kinds
    );

    let folders: Vec<&str> = conversion
        .export
        .folders()
        .iter()
        .map(|f| f.name.as_str())
        .collect();
    assert_eq!(vec!["Login", "Credit Card", "Identity", "Note"], folders);
    assert_eq!(items[0].folder_id(), items[4].folder_id());

    let ItemData::Login(login) = items[0].data() else {
        panic!("expecting login data");
    };
    assert_eq!(Some("a@b.com"), login.username.as_deref());
    assert_eq!(Some("p"), login.password.as_deref());
    assert_eq!("https://mail.google.com", login.uris[0].uri());
    assert!(login.uris[0].match_type().is_none());
    assert!(!items[0].favorite());

    let ItemData::Card(card) = items[1].data() else {
        panic!("expecting card data");
    };
    assert_eq!(Some("4111111111111111"), card.number.as_deref());
    assert_eq!(Some("4"), card.exp_month.as_deref());
    assert_eq!(Some("2027"), card.exp_year.as_deref());
    assert!(items[1].favorite());
    assert_eq!(vec![CustomField::hidden("PIN", "9876")], items[1].fields());

    let ItemData::Identity(identity) = items[2].data() else {
        panic!("expecting identity data");
    };
    assert_eq!(Some("Jane"), identity.first_name.as_deref());
    assert_eq!(Some("Doe"), identity.last_name.as_deref());
    assert_eq!(Some("jane@example.com"), identity.email.as_deref());
    assert_eq!(
        vec![CustomField::text("Mother's maiden name", "Smith")],
        items[2].fields()
    );

    assert_eq!(Some("dear diary\nsecond line"), items[3].notes());

    assert_eq!(
        vec![
            CustomField::hidden("Security Answer", "blue"),
            CustomField::text("Remember", "yes"),
        ],
        items[4].fields()
    );

    let skipped = conversion.report.skipped();
    assert_eq!(1, skipped.len());
    assert_eq!(7, skipped[0].line);
    assert_eq!(Some("Broken"), skipped[0].name.as_deref());
    assert!(skipped[0].reason.contains("sometimes"));
    Ok(())
}

#[tokio::test]
async fn passwords_plus_csv_options() -> Result<()> {
    let options = MapperOptions {
        category_folders: false,
        uri_match: Some(UriMatch::Exact),
        boolean_fields: vec!["Remember".to_owned()],
        organization_id: Some("org".to_owned()),
        ..Default::default()
    };
    let conversion = PasswordsPlusCsv::new(options)
        .convert(fixture("passwords-plus-export.csv"))
        .await?;

    assert!(conversion.export.folders().is_empty());
    let items = conversion.export.items();
    assert!(items.iter().all(|i| i.folder_id().is_none()));
    assert!(items.iter().all(|i| i.organization_id() == Some("org")));

    let work = &items[4];
    let ItemData::Login(login) = work.data() else {
        panic!("expecting login data");
    };
    assert_eq!(Some(UriMatch::Exact), login.uris[0].match_type());
    assert_eq!(
        Some(&CustomField::boolean("Remember", true)),
        work.fields().last()
    );
    Ok(())
}

#[tokio::test]
async fn passwords_plus_csv_missing_title() -> Result<()> {
    let conversion = PasswordsPlusCsv::default()
        .convert(fixture("passwords-plus-no-title.csv"))
        .await?;
    assert!(conversion.export.items().is_empty());
    assert!(conversion.export.folders().is_empty());

    let skipped = conversion.report.skipped();
    assert_eq!(1, skipped.len());
    assert_eq!(2, skipped[0].line);
    assert_eq!(None, skipped[0].name);
    assert_eq!("missing required column Title", skipped[0].reason);
    Ok(())
}

#[tokio::test]
async fn passwords_plus_csv_undecodable_row() -> Result<()> {
    let conversion = PasswordsPlusCsv::default()
        .convert(fixture("passwords-plus-latin1.csv"))
        .await?;
    let names: Vec<&str> =
        conversion.export.items().iter().map(|i| i.name()).collect();
    assert_eq!(vec!["Good", "Later"], names);

    let skipped = conversion.report.skipped();
    assert_eq!(1, skipped.len());
    assert_eq!(3, skipped[0].line);
    assert_eq!(Some("Caf\u{FFFD}"), skipped[0].name.as_deref());
    assert_eq!("column Title is not valid UTF-8", skipped[0].reason);
    Ok(())
}

#[tokio::test]
async fn passwords_plus_csv_missing_file() {
    let result = PasswordsPlusCsv::default()
        .convert(fixture("does-not-exist.csv"))
        .await;
    assert!(matches!(result, Err(Error::Io(_))));
}
