use crate::error::{Error, Result};
use crate::server::dto::{CategoryBody, ItemBody};
use crate::types::{CategoryRequest, ItemRequest};

const MAX_NAME_LEN: usize = 50;

fn validate_name(name: Option<String>, entity: &str) -> Result<String> {
    let name = name.unwrap_or_default();
    if name.trim().is_empty() {
        return Err(Error::Validation(format!("{entity} name is required")));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(Error::Validation(format!(
            "{entity} name cannot exceed {MAX_NAME_LEN} characters"
        )));
    }
    Ok(name)
}

pub fn validate_category_body(body: CategoryBody) -> Result<CategoryRequest> {
    Ok(CategoryRequest {
        name: validate_name(body.name, "Category")?,
    })
}

/// Checks fields in declaration order and reports the first failure.
pub fn validate_item_body(body: ItemBody) -> Result<ItemRequest> {
    let name = validate_name(body.name, "Item")?;

    if body.quantity < 0 {
        return Err(Error::Validation(
            "Quantity must be zero or greater".to_string(),
        ));
    }

    let category_name = body
        .category_name
        .ok_or_else(|| Error::Validation("Category is required".to_string()))?;

    Ok(ItemRequest {
        name,
        quantity: body.quantity,
        category_name,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(err: Error) -> String {
        err.to_string()
    }

    #[test]
    fn test_valid_category_body() {
        let request = validate_category_body(CategoryBody {
            name: Some("Tools".to_string()),
        })
        .unwrap();
        assert_eq!(request.name, "Tools");
    }

    #[test]
    fn test_category_name_required() {
        for name in [None, Some(String::new()), Some("   ".to_string())] {
            let err = validate_category_body(CategoryBody { name }).unwrap_err();
            assert_eq!(message(err), "Category name is required");
        }
    }

    #[test]
    fn test_category_name_length() {
        let ok = "a".repeat(50);
        assert!(validate_category_body(CategoryBody { name: Some(ok) }).is_ok());

        // Limit counts characters, not bytes.
        let multibyte = "あ".repeat(50);
        assert!(validate_category_body(CategoryBody { name: Some(multibyte) }).is_ok());

        let long = "a".repeat(51);
        let err = validate_category_body(CategoryBody { name: Some(long) }).unwrap_err();
        assert_eq!(message(err), "Category name cannot exceed 50 characters");
    }

    #[test]
    fn test_valid_item_body() {
        let request = validate_item_body(ItemBody {
            name: Some("Hammer".to_string()),
            quantity: 3,
            category_name: Some("Tools".to_string()),
        })
        .unwrap();

        assert_eq!(
            request,
            ItemRequest {
                name: "Hammer".to_string(),
                quantity: 3,
                category_name: "Tools".to_string(),
            }
        );
    }

    #[test]
    fn test_item_body_rules() {
        let err = validate_item_body(ItemBody {
            name: Some(" ".to_string()),
            quantity: 1,
            category_name: Some("Tools".to_string()),
        })
        .unwrap_err();
        assert_eq!(message(err), "Item name is required");

        let err = validate_item_body(ItemBody {
            name: Some("Hammer".to_string()),
            quantity: -1,
            category_name: Some("Tools".to_string()),
        })
        .unwrap_err();
        assert_eq!(message(err), "Quantity must be zero or greater");

        let err = validate_item_body(ItemBody {
            name: Some("Hammer".to_string()),
            quantity: 0,
            category_name: None,
        })
        .unwrap_err();
        assert_eq!(message(err), "Category is required");
    }

    #[test]
    fn test_item_body_reports_first_failure() {
        let err = validate_item_body(ItemBody::default()).unwrap_err();
        assert_eq!(message(err), "Item name is required");
    }
}
