//! Parser for the Passwords Plus CSV export.
//!
//! The first row names the columns. Besides plain columns the
//! export may contain label and value pairs named `Field N` and
//! `Value N` where the row supplies the label.
use async_trait::async_trait;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tokio::io::AsyncRead;

use super::{parse_bool, parse_expiration, MapperOptions, Role, UNTITLED};
use crate::{
    export::bitwarden::{
        BitwardenExport, CustomField, FieldType, FolderRegistry, Item,
        ItemBuilder, ItemData, ItemType, UriPattern,
    },
    import::{read_csv_rows, Header, RawRow, SourceRows},
    report::ConversionReport,
    Conversion, Convert, Error, Result,
};

/// Parse rows from a reader.
pub async fn parse_reader<R: AsyncRead + Unpin + Send>(
    reader: R,
) -> Result<SourceRows> {
    read_csv_rows(reader).await
}

/// Parse rows from a path.
pub async fn parse_path<P: AsRef<Path>>(path: P) -> Result<SourceRows> {
    parse_reader(tokio::fs::File::open(path).await?).await
}

/// Where the label and value of a cell come from.
#[derive(Debug)]
enum CellSource {
    /// Labelled by the header.
    Column {
        index: usize,
        label: String,
    },
    /// Labelled by the row.
    Pair {
        label_index: usize,
        value_index: usize,
        fallback: String,
    },
}

/// Labelled value of one row.
#[derive(Debug)]
struct Cell {
    label: String,
    role: Option<Role>,
    value: Option<String>,
}

/// Maps rows of a Passwords Plus export to items.
pub struct RowMapper<'a> {
    options: &'a MapperOptions,
    columns: Vec<String>,
    name_index: Option<usize>,
    sources: Vec<CellSource>,
}

impl<'a> RowMapper<'a> {
    /// Create a mapper for the columns of a header.
    pub fn new(header: &Header, options: &'a MapperOptions) -> Self {
        let name_index = header.position(Role::Name.labels());
        let columns = header.columns();

        let mut paired = Vec::new();
        let mut sources = Vec::new();
        for (index, column) in columns.iter().enumerate() {
            if Some(index) == name_index || paired.contains(&index) {
                continue;
            }
            let value_index = pair_number(column, "Field").and_then(|n| {
                columns
                    .iter()
                    .position(|c| pair_number(c, "Value") == Some(n))
            });
            if let Some(value_index) = value_index {
                paired.push(value_index);
                sources.push(CellSource::Pair {
                    label_index: index,
                    value_index,
                    fallback: column.trim().to_owned(),
                });
            } else {
                sources.push(CellSource::Column {
                    index,
                    label: column.trim().to_owned(),
                });
            }
        }
        // A value column may precede its field column
        sources.retain(|s| match s {
            CellSource::Column { index, .. } => !paired.contains(index),
            CellSource::Pair { .. } => true,
        });

        Self {
            options,
            columns: columns.to_vec(),
            name_index,
            sources,
        }
    }

    /// Map a row to an item.
    ///
    /// The folder for the row's category is only registered
    /// once the whole row mapped successfully.
    pub fn map_row(
        &self,
        row: &RawRow,
        folders: &mut FolderRegistry,
    ) -> Result<Item> {
        if let Some(index) = row.undecodable.first() {
            let column = self
                .columns
                .get(*index)
                .map(|c| c.trim().to_owned())
                .unwrap_or_else(|| (index + 1).to_string());
            return Err(Error::InvalidEncoding { column });
        }

        let name = self
            .name_index
            .and_then(|index| row.get(index))
            .ok_or_else(|| Error::MissingColumn {
                column: Role::Name.labels()[0].to_owned(),
            })?;
        let name = if name.trim().is_empty() {
            UNTITLED.to_owned()
        } else {
            name.to_owned()
        };

        let cells = self.cells(row);
        let category = cells
            .iter()
            .find(|c| c.role == Some(Role::Category) && c.value.is_some())
            .and_then(|c| c.value.clone());
        let kind = self.item_type(category.as_deref(), &cells);

        let mut data = ItemData::empty(kind);
        let mut fields = Vec::new();
        let mut notes: Option<String> = None;
        let mut favorite = false;
        let mut category_seen = false;

        for cell in cells {
            let Some(value) = cell.value else {
                continue;
            };
            let consumed = match cell.role {
                Some(Role::Category) if !category_seen => {
                    category_seen = true;
                    true
                }
                Some(Role::Notes) if notes.is_none() => {
                    notes = Some(value.clone());
                    true
                }
                Some(Role::Favorite) => {
                    favorite = parse_bool(&value, &cell.label)?;
                    true
                }
                Some(role) => self.apply(&mut data, role, &value)?,
                None => false,
            };
            if !consumed {
                fields.push(self.custom_field(&cell.label, value)?);
            }
        }

        let folder_id = match &category {
            Some(category) if self.options.category_folders => {
                Some(folders.resolve(category).to_string())
            }
            _ => None,
        };

        tracing::debug!(
            line = row.line,
            name = %name,
            kind = %kind,
            fields = fields.len(),
            "mapped row");

        let mut item = ItemBuilder::new(name, data)
            .organization_id(self.options.organization_id.clone())
            .folder_id(folder_id)
            .reprompt(self.options.reprompt)
            .notes(notes)
            .favorite(favorite)
            .collection_ids(self.options.collection_ids.clone())
            .build();
        for field in fields {
            item.add_field(field);
        }
        Ok(item)
    }

    /// Labelled values of a row in column order, empty
    /// values are `None`.
    fn cells(&self, row: &RawRow) -> Vec<Cell> {
        self.sources
            .iter()
            .map(|source| {
                let (label, value) = match source {
                    CellSource::Column { index, label } => {
                        (label.clone(), row.get(*index))
                    }
                    CellSource::Pair {
                        label_index,
                        value_index,
                        fallback,
                    } => {
                        let label = row
                            .get(*label_index)
                            .map(|l| l.trim())
                            .filter(|l| !l.is_empty())
                            .unwrap_or(fallback);
                        (label.to_owned(), row.get(*value_index))
                    }
                };
                Cell {
                    role: Role::from_label(&label),
                    label,
                    value: value
                        .filter(|v| !v.trim().is_empty())
                        .map(|v| v.to_owned()),
                }
            })
            .collect()
    }

    /// Item type from the category or, when the category is
    /// unknown, from the values present.
    fn item_type(&self, category: Option<&str>, cells: &[Cell]) -> ItemType {
        if let Some(kind) =
            category.and_then(|c| self.options.category_type(c))
        {
            return kind;
        }
        let implied: Vec<ItemType> = cells
            .iter()
            .filter(|c| c.value.is_some())
            .filter_map(|c| c.role.and_then(|r| r.implies()))
            .collect();
        let has_card_number = cells
            .iter()
            .any(|c| c.role == Some(Role::CardNumber) && c.value.is_some());
        if has_card_number {
            ItemType::Card
        } else if implied.contains(&ItemType::Login) {
            ItemType::Login
        } else if implied.contains(&ItemType::Identity) {
            ItemType::Identity
        } else {
            ItemType::SecureNote
        }
    }

    /// Store a value in the item data, returns `false` when the
    /// role does not apply to the item type or is already set.
    fn apply(
        &self,
        data: &mut ItemData,
        role: Role,
        value: &str,
    ) -> Result<bool> {
        Ok(match (data, role) {
            (ItemData::Login(login), Role::Uri) => {
                let match_code =
                    self.options.uri_match.map(|m| i64::from(u8::from(m)));
                for uri in value
                    .split([',', '\n'])
                    .map(|u| u.trim())
                    .filter(|u| !u.is_empty())
                {
                    login.uris.push(UriPattern::new(match_code, uri)?);
                }
                true
            }
            (ItemData::Login(login), Role::Username) => {
                set(&mut login.username, value)
            }
            (ItemData::Login(login), Role::Password) => {
                set(&mut login.password, value)
            }
            (ItemData::Login(login), Role::Totp) => set(&mut login.totp, value),
            (ItemData::Card(card), role) => match role {
                Role::CardholderName => set(&mut card.cardholder_name, value),
                Role::CardBrand => set(&mut card.brand, value),
                Role::CardNumber => set(&mut card.number, value),
                Role::CardCode => set(&mut card.code, value),
                Role::CardExpMonth => match value.trim().parse::<u8>() {
                    Ok(month) if (1..=12).contains(&month) => {
                        set(&mut card.exp_month, &month.to_string())
                    }
                    _ => false,
                },
                Role::CardExpYear => {
                    let year = value.trim();
                    if year.len() == 2 && year.chars().all(|c| c.is_ascii_digit())
                    {
                        set(&mut card.exp_year, &format!("20{}", year))
                    } else {
                        set(&mut card.exp_year, year)
                    }
                }
                Role::CardExpiration => {
                    if card.exp_month.is_some() || card.exp_year.is_some() {
                        false
                    } else if let Some((month, year)) = parse_expiration(value)
                    {
                        card.exp_month = Some(month);
                        card.exp_year = Some(year);
                        true
                    } else {
                        false
                    }
                }
                _ => false,
            },
            (ItemData::Identity(identity), role) => match role {
                Role::Username => set(&mut identity.username, value),
                Role::FirstName => set(&mut identity.first_name, value),
                Role::MiddleName => set(&mut identity.middle_name, value),
                Role::LastName => set(&mut identity.last_name, value),
                Role::Email => set(&mut identity.email, value),
                Role::Phone => set(&mut identity.phone, value),
                Role::Address1 => set(&mut identity.address1, value),
                Role::Address2 => set(&mut identity.address2, value),
                Role::Address3 => set(&mut identity.address3, value),
                Role::City => set(&mut identity.city, value),
                Role::State => set(&mut identity.state, value),
                Role::PostalCode => set(&mut identity.postal_code, value),
                Role::Country => set(&mut identity.country, value),
                Role::Company => set(&mut identity.company, value),
                Role::Ssn => set(&mut identity.ssn, value),
                Role::PassportNumber => {
                    set(&mut identity.passport_number, value)
                }
                Role::LicenseNumber => set(&mut identity.license_number, value),
                _ => false,
            },
            _ => false,
        })
    }

    /// Custom field for a value without a place in the item data.
    fn custom_field(&self, label: &str, value: String) -> Result<CustomField> {
        let (kind, value) = if self.options.is_boolean(label) {
            (FieldType::Boolean, Value::Bool(parse_bool(&value, label)?))
        } else if self.options.is_hidden(label) {
            (FieldType::Hidden, Value::String(value))
        } else {
            (FieldType::Text, Value::String(value))
        };
        Ok(CustomField::new(
            label,
            i64::from(u8::from(kind)),
            Some(value),
            None,
        )?)
    }
}

fn set(slot: &mut Option<String>, value: &str) -> bool {
    if slot.is_some() {
        return false;
    }
    *slot = Some(value.to_owned());
    true
}

/// Number of a `Field N` or `Value N` column.
fn pair_number(column: &str, prefix: &str) -> Option<u32> {
    let column = column.trim();
    let head = column.get(..prefix.len())?;
    if !head.eq_ignore_ascii_case(prefix) {
        return None;
    }
    column.get(prefix.len()..)?.trim().parse().ok()
}

/// Convert a Passwords Plus CSV export into a Bitwarden document.
#[derive(Debug, Default)]
pub struct PasswordsPlusCsv {
    options: MapperOptions,
}

impl PasswordsPlusCsv {
    /// Create a converter.
    pub fn new(options: MapperOptions) -> Self {
        Self { options }
    }

    /// Map parsed rows, skipping rows that cannot be mapped.
    pub fn convert_rows(&self, source: SourceRows) -> Result<Conversion> {
        let mapper = RowMapper::new(&source.header, &self.options);
        let mut folders = FolderRegistry::default();
        let mut items = Vec::new();
        let mut report = ConversionReport::default();

        for row in &source.rows {
            match mapper.map_row(row, &mut folders) {
                Ok(item) => items.push(item),
                Err(e) if e.is_row_error() => {
                    let name = mapper
                        .name_index
                        .and_then(|index| row.get(index))
                        .map(|s| s.to_owned());
                    tracing::warn!(
                        line = row.line,
                        name = ?name,
                        error = %e,
                        "skipped row");
                    report.skip(row.line, name, &e);
                }
                Err(e) => return Err(e),
            }
        }

        tracing::info!(
            items = items.len(),
            folders = folders.len(),
            skipped = report.len(),
            "converted passwords plus rows");

        Ok(Conversion {
            export: BitwardenExport::new(folders.into_folders(), items),
            report,
        })
    }
}

#[async_trait]
impl Convert for PasswordsPlusCsv {
    type Input = PathBuf;

    async fn convert(&self, source: Self::Input) -> Result<Conversion> {
        let rows = parse_path(source).await?;
        self.convert_rows(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{export::bitwarden::UriMatch, ValidationError};
    use anyhow::Result;

    async fn rows(source: &str) -> Result<SourceRows> {
        Ok(parse_reader(source.as_bytes()).await?)
    }

    fn map_first(
        source: &SourceRows,
        options: &MapperOptions,
    ) -> crate::Result<Item> {
        let mapper = RowMapper::new(&source.header, options);
        mapper.map_row(&source.rows[0], &mut FolderRegistry::default())
    }

    #[tokio::test]
    async fn map_login() -> Result<()> {
        let source = rows(
            "Title,Category,Username,Password,URL,Notes,Favorite\n\
             Gmail,Login,a@b.com,p,\"https://mail.google.com, https://gmail.com\",hi,yes\n",
        )
        .await?;
        let options = MapperOptions {
            uri_match: Some(UriMatch::Host),
            ..Default::default()
        };
        let item = map_first(&source, &options)?;
        assert_eq!("Gmail", item.name());
        assert_eq!(ItemType::Login, item.kind());
        assert_eq!(Some("hi"), item.notes());
        assert!(item.favorite());
        assert!(item.folder_id().is_some());
        let ItemData::Login(login) = item.data() else {
            panic!("expecting login data");
        };
        assert_eq!(Some("a@b.com"), login.username.as_deref());
        assert_eq!(Some("p"), login.password.as_deref());
        assert_eq!(2, login.uris.len());
        assert_eq!("https://gmail.com", login.uris[1].uri());
        assert_eq!(Some(UriMatch::Host), login.uris[1].match_type());
        assert!(item.fields().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn field_value_pairs() -> Result<()> {
        let source = rows(
            "Title,Category,Field 1,Value 1,Field 2,Value 2,Field 3,Value 3\n\
             Bank,Login,User Name,jdoe,PIN,1234,Branch,Main St\n",
        )
        .await?;
        let item = map_first(&source, &Default::default())?;
        let ItemData::Login(login) = item.data() else {
            panic!("expecting login data");
        };
        assert_eq!(Some("jdoe"), login.username.as_deref());
        assert_eq!(
            vec![
                CustomField::hidden("PIN", "1234"),
                CustomField::text("Branch", "Main St"),
            ],
            item.fields()
        );
        Ok(())
    }

    #[tokio::test]
    async fn infer_type_without_category() -> Result<()> {
        let source = rows(
            "Title,Card Number,Expiration,CVV,Password\n\
             Visa,4111,04/27,123,\n",
        )
        .await?;
        let item = map_first(&source, &Default::default())?;
        let ItemData::Card(card) = item.data() else {
            panic!("expecting card data");
        };
        assert_eq!(Some("4111"), card.number.as_deref());
        assert_eq!(Some("4"), card.exp_month.as_deref());
        assert_eq!(Some("2027"), card.exp_year.as_deref());
        assert_eq!(Some("123"), card.code.as_deref());
        assert!(item.folder_id().is_none());

        let source = rows("Title,Notes\nDiary,dear diary\n").await?;
        let item = map_first(&source, &Default::default())?;
        assert_eq!(ItemType::SecureNote, item.kind());
        Ok(())
    }

    #[tokio::test]
    async fn values_outside_item_type_become_fields() -> Result<()> {
        let source = rows(
            "Title,Category,Password,Card Number,Email\n\
             Me,Identity,secret,,me@example.com\n",
        )
        .await?;
        let item = map_first(&source, &Default::default())?;
        let ItemData::Identity(identity) = item.data() else {
            panic!("expecting identity data");
        };
        assert_eq!(Some("me@example.com"), identity.email.as_deref());
        assert_eq!(
            vec![CustomField::hidden("Password", "secret")],
            item.fields()
        );
        Ok(())
    }

    #[tokio::test]
    async fn missing_title() -> Result<()> {
        let source = rows("Category,Password\nLogin,p\n").await?;
        let err = map_first(&source, &Default::default()).unwrap_err();
        assert!(matches!(err, Error::MissingColumn { ref column } if column == "Title"));

        let source = rows("Password,Title\np\n").await?;
        let err = map_first(&source, &Default::default()).unwrap_err();
        assert!(err.is_row_error());

        let source = rows("Title,Password\n,p\n").await?;
        assert_eq!(UNTITLED, map_first(&source, &Default::default())?.name());
        Ok(())
    }

    #[tokio::test]
    async fn boolean_fields() -> Result<()> {
        let source = rows("Title,Autofill\nSite,yes\nOther,perhaps\n").await?;
        let options = MapperOptions {
            boolean_fields: vec!["autofill".to_owned()],
            ..Default::default()
        };
        let mapper = RowMapper::new(&source.header, &options);
        let mut folders = FolderRegistry::default();
        let item = mapper.map_row(&source.rows[0], &mut folders)?;
        assert_eq!(vec![CustomField::boolean("Autofill", true)], item.fields());

        let err = mapper.map_row(&source.rows[1], &mut folders).unwrap_err();
        assert!(matches!(
            err,
            Error::SchemaValidation(ValidationError::InvalidBool(_, _))
        ));
        Ok(())
    }

    #[tokio::test]
    async fn skipped_rows_are_reported() -> Result<()> {
        let source = rows(
            "Title,Category,Favorite\n\
             First,Web,no\n\
             Broken,Bank,sometimes\n\
             Last,Web,yes\n",
        )
        .await?;
        let conversion = PasswordsPlusCsv::default().convert_rows(source)?;
        let items = conversion.export.items();
        assert_eq!(2, items.len());
        assert_eq!("First", items[0].name());
        assert_eq!("Last", items[1].name());

        // Folder for the skipped row is never created
        let folders = conversion.export.folders();
        assert_eq!(1, folders.len());
        assert_eq!("Web", folders[0].name);
        let folder_id = folders[0].id.to_string();
        assert_eq!(Some(folder_id.as_str()), items[1].folder_id());

        let skipped = conversion.report.skipped();
        assert_eq!(1, skipped.len());
        assert_eq!(3, skipped[0].line);
        assert_eq!(Some("Broken"), skipped[0].name.as_deref());
        Ok(())
    }

    #[tokio::test]
    async fn undecodable_rows_are_skipped() -> Result<()> {
        let source: &[u8] =
            b"Title,Category\nGood,Login\nCaf\xe9,Login\nLater,Login\n";
        let source = parse_reader(source).await?;
        let conversion = PasswordsPlusCsv::default().convert_rows(source)?;
        let names: Vec<&str> =
            conversion.export.items().iter().map(|i| i.name()).collect();
        assert_eq!(vec!["Good", "Later"], names);

        let skipped = conversion.report.skipped();
        assert_eq!(1, skipped.len());
        assert_eq!(3, skipped[0].line);
        assert_eq!("column Title is not valid UTF-8", skipped[0].reason);
        Ok(())
    }

    #[tokio::test]
    async fn category_from_first_non_empty_column() -> Result<()> {
        let source = rows("Title,Category,Type,Username\nGmail,,Login,a\n").await?;
        let conversion = PasswordsPlusCsv::default().convert_rows(source)?;
        let folders = conversion.export.folders();
        assert_eq!(1, folders.len());
        assert_eq!("Login", folders[0].name);

        let item = &conversion.export.items()[0];
        assert_eq!(ItemType::Login, item.kind());
        let folder_id = folders[0].id.to_string();
        assert_eq!(Some(folder_id.as_str()), item.folder_id());
        assert!(item.fields().is_empty());
        Ok(())
    }

    #[test]
    fn pair_numbers() {
        assert_eq!(Some(1), pair_number("Field 1", "Field"));
        assert_eq!(Some(12), pair_number("value12", "Value"));
        assert_eq!(None, pair_number("Fields", "Field"));
        assert_eq!(None, pair_number("Value", "Field"));
    }
}
