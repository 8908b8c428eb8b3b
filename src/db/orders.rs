use crate::db::{DbConnection, DbPool, RepositoryError};
use crate::enums::orders::{OrderDetails, OrderItemRequest};
use crate::models::common::OrderStatus;
use crate::models::menu::Menu;
use crate::models::order::{NewOrder, NewOrderItem, Order, OrderItem, OrderWithItems};
use crate::services::lifecycle::{next_status, OrderAction};
use crate::services::pricing::{price_order, PricingError};
use chrono::{DateTime, Duration, Utc};
use diesel::prelude::*;
use diesel::result::Error;
use log::{debug, error};

/// Narrows the orders loaded for provider views and daily summaries.
#[derive(Debug, Clone)]
pub struct OrderFilter {
    pub provider_id: Option<i32>,
    pub status: Option<OrderStatus>,
    pub from: DateTime<Utc>,
    pub until: DateTime<Utc>,
    /// Skip orders whose menu has since been deleted.
    pub only_active_menus: bool,
}

#[derive(Clone)]
pub struct OrderOperations {
    pool: DbPool,
    cancel_window: Duration,
}

impl OrderOperations {
    pub fn new(pool: DbPool, cancel_window_secs: i64) -> Self {
        Self {
            pool,
            cancel_window: Duration::seconds(cancel_window_secs),
        }
    }

    fn attach_items(
        conn: &mut PgConnection,
        orders: Vec<Order>,
    ) -> Result<Vec<(Order, Vec<OrderItem>)>, RepositoryError> {
        let items = OrderItem::belonging_to(&orders)
            .select(OrderItem::as_select())
            .order_by(crate::db::schema::order_items::line_no.asc())
            .load::<OrderItem>(conn)
            .map_err(|e| {
                error!("attach_items: error loading order items: {}", e);
                RepositoryError::DatabaseError(e)
            })?;

        let grouped = items.grouped_by(&orders);
        Ok(orders.into_iter().zip(grouped).collect())
    }

    fn load_with_items(
        conn: &mut PgConnection,
        orders: Vec<Order>,
    ) -> Result<Vec<OrderWithItems>, RepositoryError> {
        Ok(Self::attach_items(conn, orders)?
            .into_iter()
            .map(|(order, items)| OrderWithItems { order, items })
            .collect())
    }

    /// Prices the requested items against the menu and stores a `pending` order.
    pub fn place_order(
        &self,
        ordering_user: i32,
        ordered_menu: i32,
        requested: &[OrderItemRequest],
    ) -> Result<OrderWithItems, RepositoryError> {
        let mut conn = DbConnection::new(&self.pool).map_err(|e| {
            error!("place_order: failed to acquire DB connection: {}", e);
            e
        })?;

        conn.connection().transaction(|conn| {
            let menu = {
                use crate::db::schema::menus::dsl::*;
                menus
                    .filter(menu_id.eq(ordered_menu))
                    .filter(is_active.eq(true))
                    .select(Menu::as_select())
                    .first::<Menu>(conn)
                    .map_err(|e| match e {
                        Error::NotFound => RepositoryError::NotFound("Menu not found".to_string()),
                        other => RepositoryError::DatabaseError(other),
                    })?
            };

            let priced = price_order(&menu.sabjis, menu.prices(), requested)?;

            let order = {
                use crate::db::schema::orders::dsl::*;
                diesel::insert_into(orders)
                    .values(&NewOrder {
                        user_id: ordering_user,
                        provider_id: menu.provider_id,
                        menu_id: menu.menu_id,
                        grand_total: priced.grand_total,
                        status: OrderStatus::Pending,
                    })
                    .returning(Order::as_returning())
                    .get_result::<Order>(conn)
                    .map_err(|e| {
                        error!(
                            "place_order: error inserting order for user {} on menu {}: {}",
                            ordering_user, ordered_menu, e
                        );
                        RepositoryError::DatabaseError(e)
                    })?
            };

            let new_items = priced
                .items
                .into_iter()
                .enumerate()
                .map(|(idx, item)| {
                    let line_no = i16::try_from(idx).map_err(|_| {
                        RepositoryError::ValidationError(PricingError::TooManyItems.to_string())
                    })?;
                    Ok(NewOrderItem {
                        order_id: order.order_id,
                        line_no,
                        meal_type: item.meal_type,
                        sabji: item.sabji,
                        quantity: item.quantity,
                        price_per_unit: item.price_per_unit,
                        total_price: item.total_price,
                    })
                })
                .collect::<Result<Vec<NewOrderItem>, RepositoryError>>()?;

            let items = {
                use crate::db::schema::order_items::dsl::*;
                diesel::insert_into(order_items)
                    .values(&new_items)
                    .returning(OrderItem::as_returning())
                    .get_results::<OrderItem>(conn)
                    .map_err(RepositoryError::DatabaseError)?
            };

            debug!(
                "place_order: order {} for user {} totals {}",
                order.order_id, ordering_user, order.grand_total
            );
            Ok(OrderWithItems { order, items })
        })
    }

    pub fn list_user_orders(&self, search_user: i32) -> Result<Vec<OrderWithItems>, RepositoryError> {
        let mut conn = DbConnection::new(&self.pool).map_err(|e| {
            error!(
                "list_user_orders: failed to acquire DB connection for user {}: {}",
                search_user, e
            );
            e
        })?;

        let found = {
            use crate::db::schema::orders::dsl::*;
            orders
                .filter(user_id.eq(search_user))
                .order_by((order_date.desc(), order_id.desc()))
                .select(Order::as_select())
                .load::<Order>(conn.connection())
                .map_err(|e| {
                    error!(
                        "list_user_orders: error loading orders for user {}: {}",
                        search_user, e
                    );
                    RepositoryError::DatabaseError(e)
                })?
        };

        Self::load_with_items(conn.connection(), found)
    }

    /// Loads an order visible to `viewer`, who must be its user or its provider.
    pub fn get_order_for(&self, viewer: i32, id: i32) -> Result<OrderWithItems, RepositoryError> {
        let mut conn = DbConnection::new(&self.pool).map_err(|e| {
            error!(
                "get_order_for: failed to acquire DB connection for order {}: {}",
                id, e
            );
            e
        })?;

        let order = {
            use crate::db::schema::orders::dsl::*;
            orders
                .find(id)
                .select(Order::as_select())
                .first::<Order>(conn.connection())
                .map_err(|e| match e {
                    Error::NotFound => RepositoryError::NotFound("Order not found".to_string()),
                    other => RepositoryError::DatabaseError(other),
                })?
        };

        if order.user_id != viewer && order.provider_id != viewer {
            return Err(RepositoryError::NotFound("Order not found".to_string()));
        }

        Self::load_with_items(conn.connection(), vec![order])?
            .pop()
            .ok_or_else(|| RepositoryError::NotFound("Order not found".to_string()))
    }

    /// Applies `action` on behalf of `actor`.
    ///
    /// Cancelling is reserved to the ordering user, approving and rejecting to the
    /// order's provider.
    pub fn transition(
        &self,
        actor: i32,
        id: i32,
        action: OrderAction,
        now: DateTime<Utc>,
    ) -> Result<OrderWithItems, RepositoryError> {
        let mut conn = DbConnection::new(&self.pool).map_err(|e| {
            error!(
                "transition: failed to acquire DB connection for order {}: {}",
                id, e
            );
            e
        })?;

        let cancel_window = self.cancel_window;
        conn.connection().transaction(|conn| {
            use crate::db::schema::orders::dsl::*;

            let order = orders
                .find(id)
                .select(Order::as_select())
                .for_update()
                .first::<Order>(conn)
                .map_err(|e| match e {
                    Error::NotFound => RepositoryError::NotFound("Order not found".to_string()),
                    other => RepositoryError::DatabaseError(other),
                })?;

            let owner = match action {
                OrderAction::Cancel => order.user_id,
                OrderAction::Approve | OrderAction::Reject => order.provider_id,
            };
            if owner != actor {
                return Err(RepositoryError::Forbidden(format!(
                    "Not allowed to {:?} order {}",
                    action, id
                )));
            }

            let target = next_status(order.status, action, order.created_at, now, cancel_window)
                .map_err(|e| RepositoryError::InvalidState(e.to_string()))?;

            let updated = diesel::update(orders.find(id))
                .set((status.eq(target), updated_at.eq(now)))
                .returning(Order::as_returning())
                .get_result::<Order>(conn)
                .map_err(|e| {
                    error!("transition: error updating order {}: {}", id, e);
                    RepositoryError::DatabaseError(e)
                })?;

            debug!(
                "transition: order {} moved {} -> {} by {}",
                id, order.status, updated.status, actor
            );
            Self::load_with_items(conn, vec![updated])?
                .pop()
                .ok_or_else(|| RepositoryError::NotFound("Order not found".to_string()))
        })
    }

    /// Orders in `[filter.from, filter.until)` with the ordering user's name, newest first.
    pub fn list_order_details(
        &self,
        filter: &OrderFilter,
    ) -> Result<Vec<OrderDetails>, RepositoryError> {
        let mut conn = DbConnection::new(&self.pool).map_err(|e| {
            error!("list_order_details: failed to acquire DB connection: {}", e);
            e
        })?;

        use crate::db::schema::{menus, orders, users};

        let mut query = orders::table
            .inner_join(users::table.on(users::user_id.eq(orders::user_id)))
            .inner_join(menus::table.on(menus::menu_id.eq(orders::menu_id)))
            .filter(orders::order_date.ge(filter.from))
            .filter(orders::order_date.lt(filter.until))
            .into_boxed();

        if let Some(pid) = filter.provider_id {
            query = query.filter(orders::provider_id.eq(pid));
        }
        if let Some(wanted) = filter.status {
            query = query.filter(orders::status.eq(wanted));
        }
        if filter.only_active_menus {
            query = query.filter(menus::is_active.eq(true));
        }

        let rows = query
            .order_by((orders::order_date.desc(), orders::order_id.desc()))
            .select((Order::as_select(), users::name))
            .load::<(Order, String)>(conn.connection())
            .map_err(|e| {
                error!("list_order_details: error loading orders: {}", e);
                RepositoryError::DatabaseError(e)
            })?;

        let (found, names): (Vec<Order>, Vec<String>) = rows.into_iter().unzip();
        let with_items = Self::attach_items(conn.connection(), found)?;

        Ok(with_items
            .into_iter()
            .zip(names)
            .map(|((order, items), user_name)| OrderDetails {
                order_id: order.order_id,
                user_id: order.user_id,
                user_name,
                provider_id: order.provider_id,
                menu_id: order.menu_id,
                items,
                grand_total: order.grand_total,
                status: order.status,
                order_date: order.order_date,
            })
            .collect())
    }
}
