mod common;

use anyhow::Result;
use pos_api::database::models::{
    AddOn, AddOnInput, Category, CategoryInput, Outlet, OutletInput, TenantWritable,
};
use pos_api::database::{DatabaseError, Repository};
use rust_decimal::Decimal;
use uuid::Uuid;

fn drinks() -> CategoryInput {
    CategoryInput { name: "Drinks".to_string(), description: Some("cold and hot".to_string()) }
}

#[test]
fn blank_names_fail_validation() {
    let input = CategoryInput { name: "   ".to_string(), description: None };
    assert_eq!(Category::validate(&input).unwrap_err().field, "name");

    let input = AddOnInput { name: String::new(), price: Decimal::new(500, 2), is_active: true };
    assert!(AddOn::validate(&input).is_err());
}

#[tokio::test]
async fn category_lifecycle() -> Result<()> {
    let Some(pool) = common::test_pool().await? else { return Ok(()) };
    let company_id = common::seed_company(&pool).await?;
    let repo = Repository::<Category>::new(pool);

    let created = repo.create(company_id, &drinks()).await?;
    assert_eq!(created.company_id, company_id);
    assert_eq!(created.name, "Drinks");

    let fetched = repo.find(company_id, created.id).await?;
    assert_eq!(fetched.description.as_deref(), Some("cold and hot"));

    let updated = repo
        .update(company_id, created.id, &CategoryInput { name: "Beverages".to_string(), description: None })
        .await?;
    assert_eq!(updated.name, "Beverages");
    assert_eq!(updated.description, None);
    assert!(updated.updated_at >= created.updated_at);

    repo.delete(company_id, created.id).await?;
    let err = repo.find(company_id, created.id).await.unwrap_err();
    assert!(matches!(err, DatabaseError::NotFound(ref msg) if msg == "Category not found"));
    Ok(())
}

#[tokio::test]
async fn other_tenants_rows_are_invisible() -> Result<()> {
    let Some(pool) = common::test_pool().await? else { return Ok(()) };
    let owner = common::seed_company(&pool).await?;
    let intruder = common::seed_company(&pool).await?;
    let repo = Repository::<Category>::new(pool);

    let row = repo.create(owner, &drinks()).await?;

    assert!(matches!(repo.find(intruder, row.id).await, Err(DatabaseError::NotFound(_))));
    assert!(matches!(
        repo.update(intruder, row.id, &drinks()).await,
        Err(DatabaseError::NotFound(_))
    ));
    assert!(matches!(repo.delete(intruder, row.id).await, Err(DatabaseError::NotFound(_))));

    // Untouched for the owner.
    assert_eq!(repo.find(owner, row.id).await?.name, "Drinks");
    Ok(())
}

#[tokio::test]
async fn missing_id_is_not_found() -> Result<()> {
    let Some(pool) = common::test_pool().await? else { return Ok(()) };
    let company_id = common::seed_company(&pool).await?;
    let repo = Repository::<AddOn>::new(pool);

    let err = repo.delete(company_id, Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, DatabaseError::NotFound(ref msg) if msg == "Add-on not found"), "got {:?}", err);
    Ok(())
}

#[tokio::test]
async fn add_on_price_keeps_two_decimals() -> Result<()> {
    let Some(pool) = common::test_pool().await? else { return Ok(()) };
    let company_id = common::seed_company(&pool).await?;
    let repo = Repository::<AddOn>::new(pool);

    let input = AddOnInput { name: "Extra shot".to_string(), price: Decimal::new(1250, 2), is_active: true };
    let created = repo.create(company_id, &input).await?;
    assert_eq!(created.price, Decimal::new(1250, 2));
    assert!(created.is_active);
    Ok(())
}

#[tokio::test]
async fn outlet_optional_fields_store_null_when_blank() -> Result<()> {
    let Some(pool) = common::test_pool().await? else { return Ok(()) };
    let company_id = common::seed_company(&pool).await?;
    let repo = Repository::<Outlet>::new(pool);

    let input = OutletInput {
        code: "OUT-01".to_string(),
        name: "Main Street".to_string(),
        supervisor: Some("  ".to_string()),
        address: Some("1 Main St".to_string()),
        phone: None,
        email: None,
        is_active: true,
    };
    let created = repo.create(company_id, &input).await?;
    assert_eq!(created.code, "OUT-01");
    assert_eq!(created.supervisor, None);
    assert_eq!(created.address.as_deref(), Some("1 Main St"));
    Ok(())
}
