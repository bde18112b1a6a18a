//! Seeded in-memory bike-store database.

use anyhow::Result;
use rusqlite::Connection;

const SCHEMA: &str = r#"
CREATE TABLE brands (
    brand_id INTEGER PRIMARY KEY,
    brand_name TEXT NOT NULL
);

CREATE TABLE categories (
    category_id INTEGER PRIMARY KEY,
    category_name TEXT NOT NULL
);

CREATE TABLE products (
    product_id INTEGER PRIMARY KEY,
    product_name TEXT NOT NULL,
    brand_id INTEGER NOT NULL REFERENCES brands (brand_id),
    category_id INTEGER NOT NULL REFERENCES categories (category_id),
    model_year INTEGER NOT NULL,
    list_price REAL NOT NULL
);

CREATE TABLE customers (
    customer_id INTEGER PRIMARY KEY,
    first_name TEXT NOT NULL,
    last_name TEXT NOT NULL,
    email TEXT NOT NULL,
    city TEXT
);

CREATE TABLE orders (
    order_id INTEGER PRIMARY KEY,
    customer_id INTEGER NOT NULL REFERENCES customers (customer_id),
    order_status INTEGER NOT NULL,
    order_date TEXT NOT NULL
);

CREATE TABLE order_items (
    order_id INTEGER NOT NULL REFERENCES orders (order_id),
    item_id INTEGER NOT NULL,
    product_id INTEGER NOT NULL REFERENCES products (product_id),
    quantity INTEGER NOT NULL,
    list_price REAL NOT NULL,
    discount REAL NOT NULL DEFAULT 0,
    PRIMARY KEY (order_id, item_id)
);

INSERT INTO brands (brand_id, brand_name) VALUES
    (1, 'Electra'),
    (2, 'Haro'),
    (3, 'Trek'),
    (4, 'Surly');

INSERT INTO categories (category_id, category_name) VALUES
    (1, 'Children Bicycles'),
    (2, 'Comfort Bicycles'),
    (3, 'Electric Bikes'),
    (4, 'Mountain Bikes'),
    (5, 'Road Bikes');

INSERT INTO products (product_id, product_name, brand_id, category_id, model_year, list_price) VALUES
    (1, 'Trek 820 - 2016', 3, 4, 2016, 379.99),
    (2, 'Surly Wednesday Frameset - 2016', 4, 4, 2016, 999.99),
    (3, 'Trek Fuel EX 8 29 - 2016', 3, 4, 2016, 2899.99),
    (4, 'Trek Slash 8 27.5 - 2016', 3, 4, 2016, 3999.99),
    (5, 'Electra Townie Original 7D EQ - 2016', 1, 2, 2016, 599.99),
    (6, 'Haro Shredder Pro 20 - 2017', 2, 1, 2017, 249.99),
    (7, 'Trek Domane SLR 9 Disc - 2018', 3, 5, 2018, 11999.99),
    (8, 'Electra Cruiser 1 - 2018', 1, 2, 2018, 269.99),
    (9, 'Trek Powerfly 5 - 2018', 3, 3, 2018, 3499.99),
    (10, 'Surly Straggler - 2016', 4, 5, 2016, 1549.00);

INSERT INTO customers (customer_id, first_name, last_name, email, city) VALUES
    (1, 'Debra', 'Burks', 'debra.burks@example.com', 'Orchard Park'),
    (2, 'Kasha', 'Todd', 'kasha.todd@example.com', 'Campbell'),
    (3, 'Tameka', 'Fisher', 'tameka.fisher@example.com', 'Redondo Beach'),
    (4, 'Daryl', 'Spence', 'daryl.spence@example.com', 'Uniondale'),
    (5, 'Charolette', 'Rice', 'charolette.rice@example.com', 'Sacramento');

INSERT INTO orders (order_id, customer_id, order_status, order_date) VALUES
    (1, 1, 4, '2018-01-01'),
    (2, 2, 4, '2018-01-03'),
    (3, 3, 4, '2018-01-05'),
    (4, 4, 1, '2018-01-06'),
    (5, 5, 4, '2018-01-08');

INSERT INTO order_items (order_id, item_id, product_id, quantity, list_price, discount) VALUES
    (1, 1, 1, 1, 379.99, 0.2),
    (1, 2, 5, 1, 599.99, 0.07),
    (2, 1, 7, 1, 11999.99, 0.05),
    (3, 1, 3, 1, 2899.99, 0.05),
    (3, 2, 6, 2, 249.99, 0.1),
    (4, 1, 9, 1, 3499.99, 0.2),
    (5, 1, 10, 1, 1549.00, 0.0);
"#;

/// Open a fresh in-memory bike-store database.
pub fn bike_store() -> Result<Connection> {
    let conn = Connection::open_in_memory()?;
    conn.execute_batch(SCHEMA)?;
    Ok(conn)
}
