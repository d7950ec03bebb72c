//! Wire models for the product search and details endpoints.
//!
//! Field names follow the API's PascalCase JSON. Every response type decodes leniently: missing
//! fields take their default value so a partially populated payload still deserializes.

// self
use crate::_prelude::*;

fn is_zero(value: &i32) -> bool {
	*value == 0
}

/// Keyword search request body.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct SearchRequest {
	/// Search terms.
	pub keywords: String,
	/// Page size; the client clamps it into `1..=50` before sending.
	#[serde(skip_serializing_if = "is_zero")]
	pub record_count: i32,
	/// Zero-based offset of the first record.
	#[serde(skip_serializing_if = "is_zero")]
	pub record_start_position: i32,
	/// Result filters.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub filters: Option<Filters>,
	/// Sort order.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub sort: Option<SortOptions>,
	/// Quantity used for price calculations.
	#[serde(skip_serializing_if = "is_zero")]
	pub requested_quantity: i32,
	/// Search options such as `InStock`.
	#[serde(skip_serializing_if = "Vec::is_empty")]
	pub search_options: Vec<String>,
	/// Filter facets to return with the results.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub filter_options_request: Option<FilterRequest>,
}
impl SearchRequest {
	/// Creates a request for `keywords` with every other field unset.
	pub fn new(keywords: impl Into<String>) -> Self {
		Self { keywords: keywords.into(), ..Default::default() }
	}
}

/// Result filters applied to a search.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Filters {
	/// Category identifiers.
	#[serde(rename = "CategoryIds", skip_serializing_if = "Vec::is_empty")]
	pub category_ids: Vec<i32>,
	/// Manufacturer identifiers.
	#[serde(rename = "ManufacturerIds", skip_serializing_if = "Vec::is_empty")]
	pub manufacturer_ids: Vec<i32>,
	/// Product status identifiers.
	#[serde(rename = "StatusIds", skip_serializing_if = "Vec::is_empty")]
	pub status_ids: Vec<i32>,
	/// Package type identifiers.
	#[serde(rename = "PackageTypeIds", skip_serializing_if = "Vec::is_empty")]
	pub package_type_ids: Vec<i32>,
	/// Parametric filters.
	#[serde(skip_serializing_if = "Vec::is_empty")]
	pub parametric_filters: Vec<ParametricFilter>,
}

/// Filter on one product parameter.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParametricFilter {
	/// Parameter identifier.
	#[serde(rename = "ParameterId")]
	pub parameter_id: i32,
	/// Single accepted value.
	#[serde(rename = "ValueId", skip_serializing_if = "String::is_empty")]
	pub value_id: String,
	/// Accepted values.
	#[serde(rename = "ValueIds", skip_serializing_if = "Vec::is_empty")]
	pub value_ids: Vec<String>,
}

/// Sort field and direction.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SortOptions {
	/// Field to sort by.
	#[serde(rename = "SortOption")]
	pub field: String,
	/// `Ascending` or `Descending`.
	#[serde(rename = "Direction")]
	pub direction: String,
}

/// Facets requested alongside search results.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct FilterRequest {
	/// Category facet restriction.
	#[serde(skip_serializing_if = "Vec::is_empty")]
	pub category_filter: Vec<i32>,
	/// Manufacturer facet restriction.
	#[serde(skip_serializing_if = "Vec::is_empty")]
	pub manufacturer_filter: Vec<i32>,
	/// Status facet restriction.
	#[serde(skip_serializing_if = "Vec::is_empty")]
	pub status_filter: Vec<i32>,
	/// Package type facet restriction.
	#[serde(skip_serializing_if = "Vec::is_empty")]
	pub package_type_filter: Vec<i32>,
	/// Parameter facet restriction.
	#[serde(skip_serializing_if = "Vec::is_empty")]
	pub parameter_filter_request: Vec<ParameterFilterRequest>,
}

/// Parameter facet restriction.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParameterFilterRequest {
	/// Parameter identifier.
	#[serde(rename = "ParameterId")]
	pub parameter_id: i32,
	/// Accepted values.
	#[serde(rename = "ValueIds", skip_serializing_if = "Vec::is_empty")]
	pub value_ids: Vec<String>,
}

/// Keyword search response.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct SearchResponse {
	/// Matching products for the requested page.
	pub products: Vec<Product>,
	/// Total number of matches.
	pub products_count: i64,
	/// Products matching the keywords exactly.
	pub exact_matches: Vec<Product>,
	/// Number of exact matches.
	#[serde(rename = "ExactMatchCount")]
	pub exact_matches_count: i64,
	/// Facets available to refine the search.
	pub filter_options: FilterOptions,
	/// Locale the API used to answer.
	pub search_locale_used: SearchLocale,
	/// Parametric filters the API applied.
	pub applied_parametric_filters: Vec<AppliedFilter>,
}

/// Product details response.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ProductDetailsResponse {
	/// Requested product.
	pub product: Product,
	/// Locale the API used to answer.
	pub search_locale_used: SearchLocale,
}

/// Product record shared by search and details responses.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Product {
	/// Short and detailed descriptions.
	pub description: Description,
	/// Manufacturer.
	pub manufacturer: Manufacturer,
	/// Manufacturer part number.
	pub manufacturer_product_number: String,
	/// Unit price in the locale currency.
	pub unit_price: f64,
	/// Product page.
	#[serde(rename = "ProductUrl")]
	pub product_url: String,
	/// Datasheet link.
	#[serde(rename = "DatasheetUrl")]
	pub datasheet_url: String,
	/// Photo link.
	#[serde(rename = "PhotoUrl")]
	pub photo_url: String,
	/// Packaging variations with their pricing.
	pub product_variations: Vec<ProductVariation>,
	/// Stock on hand.
	pub quantity_available: i64,
	/// Specifications.
	pub parameters: Vec<Parameter>,
	/// Category.
	pub category: Category,
	/// Distributor part number.
	pub digi_key_product_number: String,
	/// Lifecycle status.
	pub product_status: String,
	/// Last-time-buy date, if announced.
	pub date_last_buy_chance: String,
	/// Alternate packaging options.
	pub alternate_packaging: Vec<AlternatePackage>,
	/// Long description.
	pub detailed_description: String,
	/// Tariff note.
	pub tariff_description: String,
	/// Standard package quantity.
	pub standard_package: i64,
	/// Simplified taxonomy tree.
	pub limited_taxonomy: LimitedTaxonomy,
	/// Kits containing this product.
	pub kits: Vec<Kit>,
	/// Contents when this product is a kit.
	pub kit_contents: Vec<KitContent>,
	/// Mating products.
	pub mating_products: Vec<MatingProduct>,
	/// Locale the API used to answer.
	pub search_locale_used: SearchLocale,
	/// RoHS note.
	pub rohs_info: String,
	/// Lead status.
	pub lead_status: String,
	/// REACH note.
	pub reach_info: String,
	/// Export information.
	pub export_information: String,
	/// Main photo.
	pub primary_photo: MediaLink,
	/// Additional media.
	pub media_links: Vec<MediaLink>,
	/// Product series.
	pub series: Series,
	/// Regulatory classifications.
	pub classifications: Classifications,
}

/// Packaging variation of a product.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ProductVariation {
	/// Distributor part number of this packaging.
	pub digi_key_product_number: String,
	/// Packaging type.
	pub package_type: PackageType,
	/// Quantity price breaks.
	pub standard_pricing: Vec<PriceBreak>,
	/// Stock for this packaging.
	#[serde(rename = "QuantityAvailableforPackageType")]
	pub quantity_available: i64,
	/// Minimum order quantity.
	pub minimum_order_quantity: i64,
	/// Standard package quantity.
	pub standard_package: i64,
	/// Reeling fee.
	pub digi_reel_fee: f64,
	/// Customer-specific price breaks.
	pub my_pricing: Vec<PriceBreak>,
	/// Marketplace restriction flag.
	pub marketplace_restriction: bool,
}

/// Quantity price break.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct PriceBreak {
	/// Minimum quantity for this price.
	pub break_quantity: i64,
	/// Price per unit.
	pub unit_price: f64,
	/// Price for the break quantity.
	pub total_price: f64,
}

/// Product specification entry.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Parameter {
	/// Parameter identifier.
	#[serde(rename = "ParameterId")]
	pub parameter_id: i32,
	/// Parameter name.
	pub parameter_text: String,
	/// Value identifier.
	#[serde(rename = "ValueId")]
	pub value_id: String,
	/// Value text.
	pub value_text: String,
}

/// Product category.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Category {
	/// Category identifier.
	#[serde(rename = "CategoryId")]
	pub category_id: i32,
	/// Parent category identifier.
	#[serde(rename = "ParentId")]
	pub parent_id: i32,
	/// Category name.
	pub name: String,
	/// Products in the category.
	pub product_count: i64,
	/// New products in the category.
	pub new_product_count: i64,
	/// Category image.
	#[serde(rename = "ImageUrl")]
	pub image_url: String,
	/// SEO description.
	pub seo_description: String,
	/// Sub-categories.
	pub child_categories: Vec<Category>,
}

/// Manufacturer reference.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Manufacturer {
	/// Manufacturer identifier.
	#[serde(rename = "Id")]
	pub id: i32,
	/// Manufacturer name.
	pub name: String,
}

/// Product descriptions.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Description {
	/// Short description.
	pub product_description: String,
	/// Long description.
	pub detailed_description: String,
}

/// Packaging type reference.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct PackageType {
	/// Packaging identifier.
	#[serde(rename = "Id")]
	pub id: i32,
	/// Packaging name.
	pub name: String,
}

/// Alternate packaging option.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct AlternatePackage {
	/// Distributor part number.
	pub digi_key_product_number: String,
	/// Stock.
	pub quantity_available: i64,
	/// Unit price.
	pub unit_price: f64,
	/// Packaging type.
	pub package_type: PackageType,
}

/// Simplified taxonomy node.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct LimitedTaxonomy {
	/// Child nodes.
	pub children: Vec<LimitedTaxonomy>,
	/// Node label.
	pub value: String,
	/// Node identifier.
	#[serde(rename = "Id")]
	pub id: i32,
}

/// Kit containing a product.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Kit {
	/// Distributor part number of the kit.
	pub digi_key_product_number: String,
	/// Manufacturer part number of the kit.
	pub manufacturer_part_number: String,
	/// Units of the product in the kit.
	pub quantity_in_kit: i64,
}

/// Item contained in a kit.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct KitContent {
	/// Distributor part number.
	pub digi_key_product_number: String,
	/// Manufacturer part number.
	pub manufacturer_part_number: String,
	/// Units in the kit.
	pub quantity_in_kit: i64,
}

/// Mating product reference.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct MatingProduct {
	/// Distributor part number.
	pub digi_key_product_number: String,
	/// Manufacturer part number.
	pub manufacturer_part_number: String,
}

/// Locale echoed back by the API.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct SearchLocale {
	/// Site code.
	pub site: String,
	/// Language code.
	pub language: String,
	/// Currency code.
	pub currency: String,
}

/// Media resource.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct MediaLink {
	/// Media kind.
	pub media_type: String,
	/// Title.
	pub title: String,
	/// Small photo link.
	pub small_photo: String,
	/// Thumbnail link.
	pub thumbnail: String,
	/// Full-size link.
	#[serde(rename = "Url")]
	pub url: String,
}

/// Product series reference.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Series {
	/// Series identifier.
	#[serde(rename = "Id")]
	pub id: i32,
	/// Series name.
	pub name: String,
}

/// Regulatory classifications.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Classifications {
	/// REACH status.
	pub reach_status: String,
	/// RoHS status.
	pub rohs_status: String,
	/// Moisture sensitivity level.
	pub moisture_sensitivity_level: String,
	/// Export control classification number.
	pub export_control_class_number: String,
	/// Harmonized tariff code.
	#[serde(rename = "HtsusCode")]
	pub htsus_code: String,
}

/// Facets available to refine a search.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct FilterOptions {
	/// Category facet.
	pub categories: Vec<CategoryFilter>,
	/// Manufacturer facet.
	pub manufacturers: Vec<ManufacturerFilter>,
	/// Status facet.
	pub status: Vec<StatusFilter>,
	/// Packaging facet.
	pub package_types: Vec<PackageTypeFilter>,
	/// Parameter facets.
	pub parametric_filters: Vec<ParametricFilterOption>,
}

/// Category facet entry.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct CategoryFilter {
	/// Category.
	pub category: Category,
	/// Matching products.
	pub product_count: i64,
}

/// Manufacturer facet entry.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ManufacturerFilter {
	/// Manufacturer.
	pub manufacturer: Manufacturer,
	/// Matching products.
	pub product_count: i64,
}

/// Status facet entry.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct StatusFilter {
	/// Status identifier.
	#[serde(rename = "StatusId")]
	pub status_id: i32,
	/// Status name.
	pub status_name: String,
	/// Matching products.
	pub product_count: i64,
}

/// Packaging facet entry.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct PackageTypeFilter {
	/// Packaging type.
	pub package_type: PackageType,
	/// Matching products.
	pub product_count: i64,
}

/// Parameter facet.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ParametricFilterOption {
	/// Parameter identifier.
	#[serde(rename = "ParameterId")]
	pub parameter_id: i32,
	/// Parameter name.
	pub parameter_name: String,
	/// Available values.
	pub values: Vec<FilterValue>,
}

/// Value of a parameter facet.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct FilterValue {
	/// Value identifier.
	#[serde(rename = "ValueId")]
	pub value_id: String,
	/// Value text.
	pub value_text: String,
	/// Matching products.
	pub product_count: i64,
}

/// Parametric filter the API applied.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct AppliedFilter {
	/// Parameter identifier.
	#[serde(rename = "ParameterId")]
	pub parameter_id: i32,
	/// Parameter name.
	pub parameter_name: String,
	/// Value identifier.
	#[serde(rename = "ValueId")]
	pub value_id: String,
	/// Value text.
	pub value_text: String,
}
