#[path = "../../../fixtures/support/postgres.rs"]
mod support;

use anyhow::{Context, Result};
use autoshop_core::{
    CarSearch, Entity, Error, Payload, READ_ALL_LIMIT, SearchCriteria, Value,
};
use autoshop_gateway::{Created, Store, ensure_deletable, validate};
use chrono::NaiveDate;

use support::fresh_db;

async fn create_owner(store: &Store, first: &str) -> Result<i64> {
    let payload = Payload::new()
        .with("firstname", first)
        .with("lastname", "Lindqvist")
        .with("phone", "555-0100")
        .with("email", Value::Null);
    match store.gateway(Entity::Owner).create(&payload).await? {
        Created::Key(key) => Ok(key),
        other => anyhow::bail!("owner insert returned {other:?}"),
    }
}

async fn create_car(store: &Store, make: &str, year: i64, owner: Option<i64>) -> Result<i64> {
    let payload = Payload::new()
        .with("make", make)
        .with("model", "Base")
        .with("year", year)
        .with("vin", "VIN0000000000001")
        .with("ownerid", owner);
    match store.gateway(Entity::Car).create(&payload).await? {
        Created::Key(key) => Ok(key),
        other => anyhow::bail!("car insert returned {other:?}"),
    }
}

#[tokio::test]
async fn created_rows_read_back_with_supplied_values() -> Result<()> {
    let Some(db) = fresh_db().await? else {
        return Ok(());
    };
    let store = Store::new(db.pool.clone());

    let owner = create_owner(&store, "Astrid").await?;
    let payload = Payload::new()
        .with("make", "Volvo")
        .with("model", "240")
        .with("year", 1988)
        .with("vin", "YV1AX8849J1234567")
        .with("ownerid", owner);
    let Created::Key(key) = store.gateway(Entity::Car).create(&payload).await? else {
        anyhow::bail!("car insert should return its key");
    };

    let record = store
        .gateway(Entity::Car)
        .read_by_pk(key)
        .await?
        .context("created car is readable")?;
    for (column, value) in payload.iter() {
        let stored = record.get(column).context("column present")?;
        assert!(value.matches_json(stored), "{column}: {value} vs {stored}");
    }
    assert_eq!(record.get("carid").and_then(|v| v.as_i64()), Some(key));

    assert!(store.gateway(Entity::Car).read_by_pk(key + 1000).await?.is_none());
    Ok(())
}

#[tokio::test]
async fn update_changes_only_the_supplied_column() -> Result<()> {
    let Some(db) = fresh_db().await? else {
        return Ok(());
    };
    let store = Store::new(db.pool.clone());
    let owner = create_owner(&store, "Bo").await?;
    let gateway = store.gateway(Entity::Owner);

    let before = gateway.read_by_pk(owner).await?.context("owner exists")?;
    let rows = gateway
        .update(owner, &Payload::new().with("phone", "555-0199"))
        .await?;
    assert_eq!(rows, 1);

    let after = gateway.read_by_pk(owner).await?.context("owner exists")?;
    assert_eq!(after.get("phone").and_then(|v| v.as_str()), Some("555-0199"));
    for column in ["firstname", "lastname", "email"] {
        assert_eq!(before.get(column), after.get(column), "{column} unchanged");
    }

    let missing = gateway
        .update(owner + 1000, &Payload::new().with("phone", "x"))
        .await?;
    assert_eq!(missing, 0);
    Ok(())
}

#[tokio::test]
async fn delete_removes_the_row() -> Result<()> {
    let Some(db) = fresh_db().await? else {
        return Ok(());
    };
    let store = Store::new(db.pool.clone());
    let car = create_car(&store, "Saab", 1999, None).await?;

    assert_eq!(store.gateway(Entity::Car).delete(car).await?, 1);
    assert!(store.gateway(Entity::Car).read_by_pk(car).await?.is_none());
    assert_eq!(store.gateway(Entity::Car).delete(car).await?, 0);
    Ok(())
}

#[tokio::test]
async fn owner_with_cars_survives_delete_attempt() -> Result<()> {
    let Some(db) = fresh_db().await? else {
        return Ok(());
    };
    let store = Store::new(db.pool.clone());
    let owner = create_owner(&store, "Cecilia").await?;
    create_car(&store, "Volvo", 2010, Some(owner)).await?;

    let refused = ensure_deletable(&store, Entity::Owner, owner).await;
    assert!(matches!(
        refused,
        Err(Error::Referenced(message)) if message == "Cannot delete Owner with associated Cars."
    ));
    assert!(store.gateway(Entity::Owner).read_by_pk(owner).await?.is_some());

    let lonely = create_owner(&store, "Dag").await?;
    ensure_deletable(&store, Entity::Owner, lonely).await?;
    assert_eq!(store.gateway(Entity::Owner).delete(lonely).await?, 1);
    Ok(())
}

#[tokio::test]
async fn missing_owner_is_reported_before_insert() -> Result<()> {
    let Some(db) = fresh_db().await? else {
        return Ok(());
    };
    let store = Store::new(db.pool.clone());
    let payload = Payload::new()
        .with("make", "Volvo")
        .with("model", "V70")
        .with("year", 2004)
        .with("vin", "YV1SW61R841234567")
        .with("ownerid", 9999);

    let validation = validate(Entity::Car.descriptor(), &payload, &store).await?;
    assert_eq!(validation.errors, vec!["Owner with ID 9999 does not exist."]);
    assert!(store.gateway(Entity::Car).read_all().await?.is_empty());

    // Without the rule check the store's own constraint rejects the row.
    let direct = store.gateway(Entity::Car).create(&payload).await;
    assert!(matches!(direct, Err(Error::ConstraintViolation(_))));
    assert!(store.gateway(Entity::Car).read_all().await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn searches_filter_and_blank_search_lists_everything() -> Result<()> {
    let Some(db) = fresh_db().await? else {
        return Ok(());
    };
    let store = Store::new(db.pool.clone());
    create_car(&store, "Volvo", 2001, None).await?;
    create_car(&store, "Volvo", 2015, None).await?;
    create_car(&store, "Saab", 2005, None).await?;
    let gateway = store.gateway(Entity::Car);

    let blank: SearchCriteria = CarSearch::default().into();
    assert_eq!(gateway.search(&blank).await?, gateway.read_all().await?);

    let recent_volvos: SearchCriteria = CarSearch {
        make: Some("Volvo".to_string()),
        year_from: Some(2010),
        year_to: None,
    }
    .into();
    let found = gateway.search(&recent_volvos).await?;
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].get("year").and_then(|v| v.as_i64()), Some(2015));

    let bounded: SearchCriteria = CarSearch {
        make: None,
        year_from: Some(2001),
        year_to: Some(2005),
    }
    .into();
    assert_eq!(gateway.search(&bounded).await?.len(), 2);
    Ok(())
}

#[tokio::test]
async fn read_all_stops_at_the_cap() -> Result<()> {
    let Some(db) = fresh_db().await? else {
        return Ok(());
    };
    sqlx::query(
        "INSERT INTO mechanic (name, specialty) \
         SELECT 'Mechanic ' || n, 'Engines' FROM generate_series(1, 120) AS n",
    )
    .execute(&db.pool)
    .await?;
    let store = Store::new(db.pool.clone());

    let rows = store.gateway(Entity::Mechanic).read_all().await?;
    assert_eq!(rows.len() as i64, READ_ALL_LIMIT);

    let criteria = SearchCriteria::new(Entity::Mechanic).with(
        "specialty",
        autoshop_core::Op::Eq,
        "Engines",
    );
    assert_eq!(store.gateway(Entity::Mechanic).search(&criteria).await?.len(), 120);
    Ok(())
}

#[tokio::test]
async fn join_rows_report_affected_count() -> Result<()> {
    let Some(db) = fresh_db().await? else {
        return Ok(());
    };
    let store = Store::new(db.pool.clone());
    let car = create_car(&store, "Volvo", 2012, None).await?;
    let service = Payload::new()
        .with("carid", car)
        .with("servicedate", NaiveDate::from_ymd_opt(2024, 3, 1).context("date")?)
        .with("servicetype", "Oil change")
        .with("servicecost", 89.5);
    let Created::Key(service_id) = store.gateway(Entity::ServiceRecord).create(&service).await?
    else {
        anyhow::bail!("service record insert should return its key");
    };
    let Created::Key(mechanic_id) = store
        .gateway(Entity::Mechanic)
        .create(&Payload::new().with("name", "Erik").with("specialty", "Engines"))
        .await?
    else {
        anyhow::bail!("mechanic insert should return its key");
    };

    let created = store
        .gateway(Entity::ServiceMechanic)
        .create(
            &Payload::new()
                .with("serviceid", service_id)
                .with("mechanicid", mechanic_id)
                .with("hoursworked", 1.5),
        )
        .await?;
    assert_eq!(created, Created::Rows(1));

    let stored = store
        .gateway(Entity::ServiceRecord)
        .read_by_pk(service_id)
        .await?
        .context("service record exists")?;
    assert!(service.get("servicedate").context("date")?.matches_json(
        stored.get("servicedate").context("stored date")?
    ));

    let keyed = store.gateway(Entity::ServiceMechanic).read_by_pk(1).await;
    assert!(matches!(keyed, Err(Error::NoPrimaryKey(_))));
    Ok(())
}
