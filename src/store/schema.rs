//! Database schema: entity tables and analytical views

use rusqlite::{params, Connection};

/// Current schema version, recorded in `schema_version`
pub const SCHEMA_VERSION: i32 = 1;

/// Entity tables in dependency order
pub const ENTITY_TABLES: &[&str] = &[
    "position",
    "supplier_category",
    "supplier",
    "product",
    "employee",
    "customer",
    "storage_cell",
    "delivery_term",
    "supplier_contract",
    "supplier_order",
    "supplier_order_item",
    "batch",
    "batch_item",
    "stock_item",
    "custom_payment",
    "customer_order",
    "customer_order_item",
    "sale",
    "sale_item",
    "customer_refund",
    "defect",
    "supplier_return",
];

const TABLES_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER PRIMARY KEY
);

CREATE TABLE IF NOT EXISTS position (
    position_id INTEGER PRIMARY KEY AUTOINCREMENT,
    position_name TEXT NOT NULL,
    position_description TEXT
);

CREATE TABLE IF NOT EXISTS supplier_category (
    category_id INTEGER PRIMARY KEY AUTOINCREMENT,
    category_name TEXT NOT NULL,
    provides_guarantee INTEGER NOT NULL,
    provides_discount INTEGER NOT NULL,
    category_description TEXT
);

CREATE TABLE IF NOT EXISTS supplier (
    supplier_id INTEGER PRIMARY KEY AUTOINCREMENT,
    supplier_category_id INTEGER NOT NULL REFERENCES supplier_category(category_id),
    supplier_name TEXT NOT NULL,
    supplier_address TEXT NOT NULL,
    supplier_country TEXT,
    is_active INTEGER DEFAULT 1
);
CREATE INDEX IF NOT EXISTS idx_supplier_category ON supplier(supplier_category_id);

CREATE TABLE IF NOT EXISTS product (
    product_id INTEGER PRIMARY KEY AUTOINCREMENT,
    product_name TEXT NOT NULL,
    product_description TEXT,
    product_sale_price REAL NOT NULL
);

CREATE TABLE IF NOT EXISTS employee (
    employee_id INTEGER PRIMARY KEY AUTOINCREMENT,
    employee_position_id INTEGER NOT NULL REFERENCES position(position_id),
    employee_name TEXT NOT NULL,
    employee_surname TEXT NOT NULL,
    employee_patronymic TEXT,
    employee_phone TEXT,
    employee_email TEXT,
    hire_date TEXT,
    fire_date TEXT
);

CREATE TABLE IF NOT EXISTS customer (
    customer_id INTEGER PRIMARY KEY AUTOINCREMENT,
    customer_name TEXT NOT NULL,
    customer_surname TEXT NOT NULL,
    customer_patronymic TEXT,
    customer_phone TEXT,
    customer_email TEXT
);

CREATE TABLE IF NOT EXISTS storage_cell (
    cell_id INTEGER PRIMARY KEY AUTOINCREMENT,
    cell_name TEXT NOT NULL UNIQUE,
    location_description TEXT,
    width REAL NOT NULL,
    depth REAL NOT NULL,
    height REAL NOT NULL,
    max_weight INTEGER
);

CREATE TABLE IF NOT EXISTS delivery_term (
    dt_supplier_id INTEGER NOT NULL REFERENCES supplier(supplier_id),
    dt_product_id INTEGER NOT NULL REFERENCES product(product_id),
    delivery_price REAL NOT NULL,
    delivery_days INTEGER NOT NULL,
    PRIMARY KEY (dt_supplier_id, dt_product_id)
);

CREATE TABLE IF NOT EXISTS supplier_contract (
    contract_id INTEGER PRIMARY KEY AUTOINCREMENT,
    contract_supplier_id INTEGER NOT NULL REFERENCES supplier(supplier_id),
    contract_number TEXT NOT NULL,
    start_date TEXT NOT NULL,
    end_date TEXT,
    terms TEXT,
    discount REAL NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS supplier_order (
    supplier_order_id INTEGER PRIMARY KEY AUTOINCREMENT,
    manager_id INTEGER NOT NULL REFERENCES employee(employee_id),
    recipient_id INTEGER NOT NULL REFERENCES supplier(supplier_id),
    supplier_order_date TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
    expected_delivery_date TEXT,
    supplier_order_description TEXT,
    supplier_order_status INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS supplier_order_item (
    soi_supplier_order_id INTEGER NOT NULL REFERENCES supplier_order(supplier_order_id),
    soi_product_id INTEGER NOT NULL REFERENCES product(product_id),
    soi_quantity INTEGER NOT NULL,
    PRIMARY KEY (soi_supplier_order_id, soi_product_id)
);

CREATE TABLE IF NOT EXISTS batch (
    batch_id INTEGER PRIMARY KEY AUTOINCREMENT,
    batch_supplier_order_id INTEGER NOT NULL REFERENCES supplier_order(supplier_order_id),
    delivery_date TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
    batch_description TEXT
);

CREATE TABLE IF NOT EXISTS batch_item (
    batch_item_id INTEGER PRIMARY KEY AUTOINCREMENT,
    bi_batch_id INTEGER NOT NULL REFERENCES batch(batch_id),
    bi_product_id INTEGER NOT NULL REFERENCES product(product_id),
    bi_cell_id INTEGER NOT NULL REFERENCES storage_cell(cell_id),
    batch_item_quantity INTEGER NOT NULL,
    remaining_item INTEGER
);
CREATE INDEX IF NOT EXISTS idx_batch_item_product ON batch_item(bi_product_id);

CREATE TABLE IF NOT EXISTS stock_item (
    stock_batch_item_id INTEGER NOT NULL REFERENCES batch_item(batch_item_id),
    stock_storage_cell_id INTEGER NOT NULL REFERENCES storage_cell(cell_id),
    stock_item_quantity INTEGER NOT NULL,
    PRIMARY KEY (stock_batch_item_id, stock_storage_cell_id)
);

CREATE TABLE IF NOT EXISTS custom_payment (
    custom_payment_id INTEGER PRIMARY KEY AUTOINCREMENT,
    cp_batch_id INTEGER NOT NULL REFERENCES batch(batch_id),
    payment_amount REAL NOT NULL,
    payment_date TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
);

CREATE TABLE IF NOT EXISTS customer_order (
    customer_order_id INTEGER PRIMARY KEY AUTOINCREMENT,
    co_customer_id INTEGER NOT NULL REFERENCES customer(customer_id),
    customer_order_date TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
    customer_order_status INTEGER NOT NULL DEFAULT 0,
    customer_order_description TEXT
);

CREATE TABLE IF NOT EXISTS customer_order_item (
    coi_customer_order_id INTEGER NOT NULL REFERENCES customer_order(customer_order_id),
    coi_product_id INTEGER NOT NULL REFERENCES product(product_id),
    coi_quantity INTEGER NOT NULL,
    PRIMARY KEY (coi_customer_order_id, coi_product_id)
);

CREATE TABLE IF NOT EXISTS sale (
    sale_id INTEGER PRIMARY KEY AUTOINCREMENT,
    sale_customer_id INTEGER NOT NULL REFERENCES customer(customer_id),
    sale_employee_id INTEGER NOT NULL REFERENCES employee(employee_id),
    sale_customer_order_id INTEGER REFERENCES customer_order(customer_order_id),
    sale_date TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
    is_order_fulfillment INTEGER NOT NULL DEFAULT 0
);
CREATE INDEX IF NOT EXISTS idx_sale_date ON sale(sale_date);

CREATE TABLE IF NOT EXISTS sale_item (
    sale_item_id INTEGER PRIMARY KEY AUTOINCREMENT,
    si_sale_id INTEGER NOT NULL REFERENCES sale(sale_id),
    si_batch_item_id INTEGER NOT NULL REFERENCES batch_item(batch_item_id),
    si_quantity INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS customer_refund (
    customer_refund_id INTEGER PRIMARY KEY AUTOINCREMENT,
    cr_sale_item_id INTEGER NOT NULL REFERENCES sale_item(sale_item_id),
    cr_quantity INTEGER NOT NULL,
    refund_date TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
    refund_amount REAL NOT NULL,
    is_defect INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS defect (
    defect_id INTEGER PRIMARY KEY AUTOINCREMENT,
    defect_batch_item_id INTEGER NOT NULL REFERENCES batch_item(batch_item_id),
    detection_date TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
    defect_quantity INTEGER NOT NULL,
    defect_description TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS supplier_return (
    supplier_return_id INTEGER PRIMARY KEY AUTOINCREMENT,
    sr_defect_id INTEGER NOT NULL REFERENCES defect(defect_id),
    return_date TEXT NOT NULL,
    return_quantity INTEGER NOT NULL,
    compensation_amount REAL NOT NULL,
    replacement_compensation INTEGER DEFAULT 1
);
"#;

const VIEWS_SQL: &str = r#"
CREATE VIEW IF NOT EXISTS batch_info_view AS
SELECT s.supplier_id, s.supplier_name, b.batch_id, b.delivery_date,
       p.product_id, p.product_name, bi.batch_item_quantity AS product_quantity
FROM batch b
JOIN supplier_order so ON so.supplier_order_id = b.batch_supplier_order_id
JOIN supplier s ON s.supplier_id = so.recipient_id
JOIN batch_item bi ON bi.bi_batch_id = b.batch_id
JOIN product p ON p.product_id = bi.bi_product_id;

CREATE VIEW IF NOT EXISTS supplier_product_stat_view AS
SELECT s.supplier_id, s.supplier_name, s.supplier_category_id, c.category_name,
       p.product_id, p.product_name, dt.delivery_price, dt.delivery_days,
       COUNT(bv.batch_id) AS total_deliveries,
       SUM(bv.product_quantity) AS total_quantity
FROM delivery_term dt
JOIN supplier s ON s.supplier_id = dt.dt_supplier_id
JOIN supplier_category c ON c.category_id = s.supplier_category_id
JOIN product p ON p.product_id = dt.dt_product_id
LEFT JOIN batch_info_view bv ON bv.supplier_id = s.supplier_id AND bv.product_id = p.product_id
GROUP BY s.supplier_id, p.product_id;

CREATE VIEW IF NOT EXISTS available_product_on_storage_view AS
SELECT p.product_id, p.product_name, bi.batch_item_id, bi.remaining_item AS current_quantity,
       sc.cell_id, sc.cell_name, b.batch_id, b.delivery_date
FROM batch_item bi
JOIN product p ON p.product_id = bi.bi_product_id
JOIN storage_cell sc ON sc.cell_id = bi.bi_cell_id
JOIN batch b ON b.batch_id = bi.bi_batch_id
WHERE COALESCE(bi.remaining_item, 0) > 0;

CREATE VIEW IF NOT EXISTS customer_purchase_stat_view AS
SELECT c.customer_id, c.customer_name, c.customer_surname, c.customer_patronymic,
       p.product_id, p.product_name,
       SUM(si.si_quantity) AS total_purchased,
       ROUND(SUM(si.si_quantity * p.product_sale_price), 2) AS total_spent
FROM sale s
JOIN customer c ON c.customer_id = s.sale_customer_id
JOIN sale_item si ON si.si_sale_id = s.sale_id
JOIN batch_item bi ON bi.batch_item_id = si.si_batch_item_id
JOIN product p ON p.product_id = bi.bi_product_id
GROUP BY c.customer_id, p.product_id;

CREATE VIEW IF NOT EXISTS customer_orders_product_view AS
SELECT p.product_id, p.product_name, SUM(coi.coi_quantity) AS total_ordered
FROM customer_order_item coi
JOIN customer_order co ON co.customer_order_id = coi.coi_customer_order_id
JOIN product p ON p.product_id = coi.coi_product_id
WHERE co.customer_order_status = 0
GROUP BY p.product_id;

CREATE VIEW IF NOT EXISTS defective_item_view AS
SELECT d.defect_id, d.defect_quantity, d.detection_date, d.defect_description,
       p.product_id, p.product_name, s.supplier_id, s.supplier_name,
       b.delivery_date AS batch_delivery_date
FROM defect d
JOIN batch_item bi ON bi.batch_item_id = d.defect_batch_item_id
JOIN product p ON p.product_id = bi.bi_product_id
JOIN batch b ON b.batch_id = bi.bi_batch_id
JOIN supplier_order so ON so.supplier_order_id = b.batch_supplier_order_id
JOIN supplier s ON s.supplier_id = so.recipient_id;

CREATE VIEW IF NOT EXISTS sale_with_supplier_info_view AS
SELECT si.sale_item_id, s.sale_id, s.sale_date, p.product_id, p.product_name,
       si.si_quantity AS sale_quantity, p.product_sale_price AS sale_price,
       sup.supplier_id, sup.supplier_name,
       COALESCE(dt.delivery_price, 0) AS purchase_price,
       ROUND(si.si_quantity * (p.product_sale_price - COALESCE(dt.delivery_price, 0)), 2) AS profit
FROM sale_item si
JOIN sale s ON s.sale_id = si.si_sale_id
JOIN batch_item bi ON bi.batch_item_id = si.si_batch_item_id
JOIN product p ON p.product_id = bi.bi_product_id
JOIN batch b ON b.batch_id = bi.bi_batch_id
JOIN supplier_order so ON so.supplier_order_id = b.batch_supplier_order_id
JOIN supplier sup ON sup.supplier_id = so.recipient_id
LEFT JOIN delivery_term dt ON dt.dt_supplier_id = sup.supplier_id AND dt.dt_product_id = p.product_id;
"#;

/// Create every table and view and record the schema version
pub(super) fn create(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(TABLES_SQL)?;
    conn.execute_batch(VIEWS_SQL)?;
    conn.execute(
        "INSERT OR REPLACE INTO schema_version (version) VALUES (?1)",
        params![SCHEMA_VERSION],
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_entity_table_is_created() {
        let conn = Connection::open_in_memory().unwrap();
        create(&conn).unwrap();

        for table in ENTITY_TABLES {
            let found: i64 = conn
                .query_row(
                    "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
                    params![table],
                    |row| row.get(0),
                )
                .unwrap();
            assert_eq!(found, 1, "missing table {}", table);
        }
    }

    #[test]
    fn test_views_are_queryable() {
        let conn = Connection::open_in_memory().unwrap();
        create(&conn).unwrap();

        for view in [
            "batch_info_view",
            "supplier_product_stat_view",
            "available_product_on_storage_view",
            "customer_purchase_stat_view",
            "customer_orders_product_view",
            "defective_item_view",
            "sale_with_supplier_info_view",
        ] {
            let sql = format!("SELECT COUNT(*) FROM {}", view);
            let n: i64 = conn.query_row(&sql, [], |row| row.get(0)).unwrap();
            assert_eq!(n, 0);
        }
    }

    #[test]
    fn test_create_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        create(&conn).unwrap();
        create(&conn).unwrap();
    }
}
