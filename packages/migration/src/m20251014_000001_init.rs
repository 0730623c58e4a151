use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_query::{ColumnDef, ForeignKeyAction, Index, Table};

#[derive(DeriveMigrationName)]
pub struct Migration;

// ----- Iden enums for tables & columns -----
#[derive(Iden)]
enum Users {
    Table,
    Id,
    Username,
    PasswordHash,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Items {
    Table,
    Id,
    Slug,
    Name,
    Description,
    Price,
    Category,
    Rating,
    Reviews,
    Image,
    InStock,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Carts {
    Table,
    Id,
    UserId,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum CartItems {
    Table,
    Id,
    CartId,
    ItemId,
    Quantity,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Orders {
    Table,
    Id,
    UserId,
    Total,
    Status,
    CreatedAt,
    UpdatedAt,
}

fn id_col<T: IntoIden>(col: T) -> ColumnDef {
    ColumnDef::new(col)
        .big_integer()
        .not_null()
        .primary_key()
        .auto_increment()
        .to_owned()
}

fn timestamp_col<T: IntoIden>(col: T) -> ColumnDef {
    ColumnDef::new(col)
        .timestamp_with_time_zone()
        .not_null()
        .to_owned()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // users
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(id_col(Users::Id))
                    .col(ColumnDef::new(Users::Username).string().not_null())
                    .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                    .col(timestamp_col(Users::CreatedAt))
                    .col(timestamp_col(Users::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("ux_users_username")
                    .table(Users::Table)
                    .col(Users::Username)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // items
        manager
            .create_table(
                Table::create()
                    .table(Items::Table)
                    .if_not_exists()
                    .col(id_col(Items::Id))
                    .col(ColumnDef::new(Items::Slug).string().not_null())
                    .col(ColumnDef::new(Items::Name).string().not_null())
                    .col(
                        ColumnDef::new(Items::Description)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(Items::Price).double().not_null())
                    .col(ColumnDef::new(Items::Category).string().not_null())
                    .col(
                        ColumnDef::new(Items::Rating)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(Items::Reviews)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Items::Image).string().not_null().default(""))
                    .col(
                        ColumnDef::new(Items::InStock)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(timestamp_col(Items::CreatedAt))
                    .col(timestamp_col(Items::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("ux_items_slug")
                    .table(Items::Table)
                    .col(Items::Slug)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("ix_items_category")
                    .table(Items::Table)
                    .col(Items::Category)
                    .to_owned(),
            )
            .await?;

        // carts
        manager
            .create_table(
                Table::create()
                    .table(Carts::Table)
                    .if_not_exists()
                    .col(id_col(Carts::Id))
                    .col(ColumnDef::new(Carts::UserId).big_integer().not_null())
                    .col(timestamp_col(Carts::CreatedAt))
                    .col(timestamp_col(Carts::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_carts_user_id")
                            .from(Carts::Table, Carts::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("ix_carts_user_id")
                    .table(Carts::Table)
                    .col(Carts::UserId)
                    .to_owned(),
            )
            .await?;

        // cart_items
        manager
            .create_table(
                Table::create()
                    .table(CartItems::Table)
                    .if_not_exists()
                    .col(id_col(CartItems::Id))
                    .col(ColumnDef::new(CartItems::CartId).big_integer().not_null())
                    .col(ColumnDef::new(CartItems::ItemId).big_integer().not_null())
                    .col(
                        ColumnDef::new(CartItems::Quantity)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(timestamp_col(CartItems::CreatedAt))
                    .col(timestamp_col(CartItems::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_cart_items_cart_id")
                            .from(CartItems::Table, CartItems::CartId)
                            .to(Carts::Table, Carts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_cart_items_item_id")
                            .from(CartItems::Table, CartItems::ItemId)
                            .to(Items::Table, Items::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("ux_cart_items_cart_item")
                    .table(CartItems::Table)
                    .col(CartItems::CartId)
                    .col(CartItems::ItemId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // orders
        manager
            .create_table(
                Table::create()
                    .table(Orders::Table)
                    .if_not_exists()
                    .col(id_col(Orders::Id))
                    .col(ColumnDef::new(Orders::UserId).big_integer().not_null())
                    .col(
                        ColumnDef::new(Orders::Total)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(Orders::Status)
                            .string()
                            .not_null()
                            .default("pending"),
                    )
                    .col(timestamp_col(Orders::CreatedAt))
                    .col(timestamp_col(Orders::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_orders_user_id")
                            .from(Orders::Table, Orders::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("ix_orders_user_id")
                    .table(Orders::Table)
                    .col(Orders::UserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // drop in reverse order of dependencies; indexes go with their tables on SQLite
        manager
            .drop_table(Table::drop().table(Orders::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CartItems::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Carts::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Items::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).if_exists().to_owned())
            .await?;

        Ok(())
    }
}
