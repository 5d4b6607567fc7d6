use anyhow::Result;
use pp2bw_migrate::{
    export::bitwarden::{
        BitwardenExport, CustomField, Folder, ItemBuilder, ItemData,
        LinkedId, Login, UriPattern,
    },
    import::csv::passwords_plus::PasswordsPlusCsv,
    Convert,
};
use pp2bw_unit_tests::fixture;
use serde_json::{json, Value};
use tempfile::tempdir;
use uuid::Uuid;

fn login_export() -> Result<BitwardenExport> {
    let folder = Folder {
        id: Uuid::new_v4(),
        name: "Login".to_owned(),
    };
    let login = Login {
        uris: vec![UriPattern::new(Some(0), "https://mail.google.com")?],
        username: Some("a@b.com".to_owned()),
        password: Some("p".to_owned()),
        totp: None,
    };
    let item = ItemBuilder::new("Gmail", ItemData::Login(login))
        .folder_id(Some(folder.id.to_string()))
        .field(CustomField::hidden("PIN", "1234"))
        .field(CustomField::linked("user", LinkedId::LoginUsername))
        .build();
    Ok(BitwardenExport::new(vec![folder], vec![item]))
}

#[tokio::test]
async fn bitwarden_export_write() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("bitwarden.json");
    let export = login_export()?;
    export.write(&path).await?;

    let contents = tokio::fs::read_to_string(&path).await?;
    assert!(contents.starts_with("{\n  \"folders\": [\n    {\n"));

    let value: Value = serde_json::from_str(&contents)?;
    let folder_id = export.folders()[0].id.to_string();
    assert_eq!(
        json!({
            "collectionIds": null,
            "favorite": false,
            "fields": [
                { "name": "PIN", "type": 1, "value": "1234" },
                { "linkedId": 100, "name": "user", "type": 3, "value": null },
            ],
            "folderId": folder_id,
            "login": {
                "password": "p",
                "totp": null,
                "uris": [{ "match": 0, "uri": "https://mail.google.com" }],
                "username": "a@b.com",
            },
            "name": "Gmail",
            "notes": null,
            "organizationId": null,
            "reprompt": null,
            "type": 1,
        }),
        value["items"][0]
    );
    assert_eq!(json!([{ "id": folder_id, "name": "Login" }]), value["folders"]);

    // Only the document is left in the directory
    let mut entries = tokio::fs::read_dir(dir.path()).await?;
    let mut count = 0;
    while entries.next_entry().await?.is_some() {
        count += 1;
    }
    assert_eq!(1, count);
    Ok(())
}

#[tokio::test]
async fn bitwarden_export_replace() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("bitwarden.json");
    tokio::fs::write(&path, "stale").await?;

    let export = BitwardenExport::new(vec![], vec![]);
    export.write(&path).await?;
    let value: Value =
        serde_json::from_str(&tokio::fs::read_to_string(&path).await?)?;
    assert_eq!(json!({ "folders": [], "items": [] }), value);
    Ok(())
}

#[tokio::test]
async fn bitwarden_export_is_stable() -> Result<()> {
    let conversion = PasswordsPlusCsv::default()
        .convert(fixture("passwords-plus-export.csv"))
        .await?;
    let first = conversion.export.to_json()?;
    let second = conversion.export.to_json()?;
    assert_eq!(first, second);

    let value: Value = serde_json::from_str(&first)?;
    let items = value["items"].as_array().cloned().unwrap_or_default();
    assert_eq!(5, items.len());
    let codes: Vec<u64> =
        items.iter().filter_map(|i| i["type"].as_u64()).collect();
    assert_eq!(vec![1, 3, 4, 2, 1], codes);
    assert_eq!(json!({ "type": 0 }), items[3]["secureNote"]);
    assert_eq!("4111111111111111", items[1]["card"]["number"]);

    assert_eq!("Gmail", items[0]["name"]);
    assert_eq!("a@b.com", items[0]["login"]["username"]);
    assert_eq!("p", items[0]["login"]["password"]);
    Ok(())
}
