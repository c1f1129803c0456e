use serde::Deserialize;

/// Raw body of `POST /category` and `PUT /category`.
#[derive(Debug, Default, Deserialize)]
pub struct CategoryBody {
    #[serde(default)]
    pub name: Option<String>,
}

/// Raw body of `POST /item` and `PUT /item`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemBody {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub quantity: i64,
    #[serde(default)]
    pub category_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CategoryItemsParams {
    #[serde(rename = "categoryId")]
    pub category_id: String,
}

#[derive(Debug, Deserialize)]
pub struct CategoryIdParams {
    pub category_id: String,
}

#[derive(Debug, Deserialize)]
pub struct ItemListParams {
    pub category_name: String,
}

#[derive(Debug, Deserialize)]
pub struct ItemIdParams {
    pub item_id: String,
}
