//! Registry entries for every shop entity

use super::{Column, TableDefinition};
use crate::core::ColumnKind::{Bool, Date, DateTime, Decimal, Integer, Text};

pub static TABLES: &[TableDefinition] = &[
    SUPPLIERS,
    SUPPLIER_CATEGORIES,
    PRODUCTS,
    BATCHES,
    BATCH_ITEMS,
    CUSTOMERS,
    SALES,
    SALE_ITEMS,
    EMPLOYEES,
    POSITIONS,
    SUPPLIER_ORDERS,
    SUPPLIER_ORDER_ITEMS,
    DELIVERY_TERMS,
    STORAGE_CELLS,
    STOCK_ITEMS,
    CUSTOMER_REFUNDS,
    DEFECTS,
    SUPPLIER_CONTRACTS,
    CUSTOMER_ORDERS,
    CUSTOMER_ORDER_ITEMS,
    SUPPLIER_RETURNS,
    CUSTOM_PAYMENTS,
];

const SUPPLIERS: TableDefinition = TableDefinition {
    name: "suppliers",
    display_name: "Suppliers",
    table: "supplier",
    select: "SELECT s.supplier_id, s.supplier_name, s.supplier_category_id, c.category_name,
                    s.supplier_address, s.supplier_country, s.is_active
             FROM supplier s
             JOIN supplier_category c ON c.category_id = s.supplier_category_id",
    order_by: "supplier_id",
    columns: &[
        Column::new("ID", "supplier_id", Integer).id().hidden(),
        Column::new("Name", "supplier_name", Text),
        Column::new("Category", "category_name", Text)
            .field("supplier_category_id")
            .references("supplier-categories", "category_id", "category_name"),
        Column::new("Address", "supplier_address", Text),
        Column::new("Country", "supplier_country", Text).optional(),
        Column::new("Active", "is_active", Bool).optional().defaulted(),
    ],
};

const SUPPLIER_CATEGORIES: TableDefinition = TableDefinition {
    name: "supplier-categories",
    display_name: "Supplier categories",
    table: "supplier_category",
    select: "SELECT category_id, category_name, provides_guarantee, provides_discount,
                    category_description
             FROM supplier_category",
    order_by: "category_id",
    columns: &[
        Column::new("ID", "category_id", Integer).id().hidden(),
        Column::new("Name", "category_name", Text),
        Column::new("Guarantee", "provides_guarantee", Bool),
        Column::new("Discount", "provides_discount", Bool),
        Column::new("Description", "category_description", Text).optional(),
    ],
};

const PRODUCTS: TableDefinition = TableDefinition {
    name: "products",
    display_name: "Products",
    table: "product",
    select: "SELECT product_id, product_name, product_sale_price, product_description FROM product",
    order_by: "product_id",
    columns: &[
        Column::new("ID", "product_id", Integer).id().hidden(),
        Column::new("Name", "product_name", Text),
        Column::new("Sale price", "product_sale_price", Decimal),
        Column::new("Description", "product_description", Text).optional(),
    ],
};

// Batches reach their supplier through the supplier order they fulfil.
const BATCHES: TableDefinition = TableDefinition {
    name: "batches",
    display_name: "Batches",
    table: "batch",
    select: "SELECT b.batch_id, b.batch_supplier_order_id, s.supplier_name, b.delivery_date,
                    b.batch_description
             FROM batch b
             JOIN supplier_order so ON so.supplier_order_id = b.batch_supplier_order_id
             JOIN supplier s ON s.supplier_id = so.recipient_id",
    order_by: "batch_id",
    columns: &[
        Column::new("Batch no.", "batch_id", Integer).id(),
        Column::new("Supplier order", "batch_supplier_order_id", Integer).references(
            "supplier-orders",
            "supplier_order_id",
            "order_label",
        ),
        Column::new("Supplier", "supplier_name", Text).computed(),
        Column::new("Delivered", "delivery_date", DateTime).defaulted(),
        Column::new("Description", "batch_description", Text).optional(),
    ],
};

const BATCH_ITEMS: TableDefinition = TableDefinition {
    name: "batch-items",
    display_name: "Batch items",
    table: "batch_item",
    select: "SELECT bi.batch_item_id, bi.bi_batch_id, bi.bi_product_id, p.product_name,
                    bi.bi_cell_id, sc.cell_name, bi.batch_item_quantity, bi.remaining_item,
                    p.product_name || ' (batch ' || bi.bi_batch_id || ')' AS item_label
             FROM batch_item bi
             JOIN product p ON p.product_id = bi.bi_product_id
             JOIN storage_cell sc ON sc.cell_id = bi.bi_cell_id",
    order_by: "batch_item_id",
    columns: &[
        Column::new("ID", "batch_item_id", Integer).id().hidden(),
        Column::new("Batch no.", "bi_batch_id", Integer).references("batches", "batch_id", "batch_id"),
        Column::new("Product", "product_name", Text)
            .field("bi_product_id")
            .references("products", "product_id", "product_name"),
        Column::new("Cell", "cell_name", Text)
            .field("bi_cell_id")
            .references("storage-cells", "cell_id", "cell_name"),
        Column::new("Quantity", "batch_item_quantity", Integer),
        Column::new("Remaining", "remaining_item", Integer).optional(),
        Column::new("Item", "item_label", Text).computed().hidden(),
    ],
};

const CUSTOMERS: TableDefinition = TableDefinition {
    name: "customers",
    display_name: "Customers",
    table: "customer",
    select: "SELECT customer_id, customer_surname, customer_name, customer_patronymic,
                    customer_phone, customer_email,
                    customer_surname || ' ' || customer_name
                        || COALESCE(' ' || customer_patronymic, '') AS full_name
             FROM customer",
    order_by: "customer_id",
    columns: &[
        Column::new("ID", "customer_id", Integer).id().hidden(),
        Column::new("Surname", "customer_surname", Text),
        Column::new("Name", "customer_name", Text),
        Column::new("Patronymic", "customer_patronymic", Text).optional(),
        Column::new("Phone", "customer_phone", Text).optional(),
        Column::new("Email", "customer_email", Text).optional(),
        Column::new("Full name", "full_name", Text).computed().hidden(),
    ],
};

const SALES: TableDefinition = TableDefinition {
    name: "sales",
    display_name: "Sales",
    table: "sale",
    select: "SELECT s.sale_id, s.sale_customer_id,
                    c.customer_surname || ' ' || c.customer_name
                        || COALESCE(' ' || c.customer_patronymic, '') AS customer_full_name,
                    s.sale_employee_id,
                    e.employee_surname || ' ' || e.employee_name
                        || COALESCE(' ' || e.employee_patronymic, '') AS employee_full_name,
                    s.sale_customer_order_id, s.sale_date, s.is_order_fulfillment,
                    (SELECT ROUND(COALESCE(SUM(si.si_quantity * p.product_sale_price), 0), 2)
                     FROM sale_item si
                     JOIN batch_item bi ON bi.batch_item_id = si.si_batch_item_id
                     JOIN product p ON p.product_id = bi.bi_product_id
                     WHERE si.si_sale_id = s.sale_id) AS sale_total_amount,
                    '#' || s.sale_id || ' ' || date(s.sale_date) AS sale_label
             FROM sale s
             JOIN customer c ON c.customer_id = s.sale_customer_id
             JOIN employee e ON e.employee_id = s.sale_employee_id",
    order_by: "sale_id",
    columns: &[
        Column::new("ID", "sale_id", Integer).id().hidden(),
        Column::new("Customer", "customer_full_name", Text)
            .field("sale_customer_id")
            .references("customers", "customer_id", "full_name"),
        Column::new("Employee", "employee_full_name", Text)
            .field("sale_employee_id")
            .references("employees", "employee_id", "full_name"),
        Column::new("Customer order", "sale_customer_order_id", Integer)
            .optional()
            .references("customer-orders", "customer_order_id", "order_label"),
        Column::new("Sale date", "sale_date", DateTime).defaulted(),
        Column::new("Order fulfilment", "is_order_fulfillment", Bool).defaulted(),
        Column::new("Total", "sale_total_amount", Decimal).computed(),
        Column::new("Sale", "sale_label", Text).computed().hidden(),
    ],
};

const SALE_ITEMS: TableDefinition = TableDefinition {
    name: "sale-items",
    display_name: "Sale items",
    table: "sale_item",
    select: "SELECT si.sale_item_id, si.si_sale_id, si.si_batch_item_id, p.product_name,
                    si.si_quantity, p.product_sale_price AS product_price,
                    p.product_name || ' (sale #' || si.si_sale_id || ')' AS item_label
             FROM sale_item si
             JOIN batch_item bi ON bi.batch_item_id = si.si_batch_item_id
             JOIN product p ON p.product_id = bi.bi_product_id",
    order_by: "sale_item_id",
    columns: &[
        Column::new("Sale item", "sale_item_id", Integer).id(),
        Column::new("Sale", "si_sale_id", Integer).references("sales", "sale_id", "sale_label"),
        Column::new("Product", "product_name", Text)
            .field("si_batch_item_id")
            .references("batch-items", "batch_item_id", "item_label"),
        Column::new("Quantity", "si_quantity", Integer),
        Column::new("Price", "product_price", Decimal).computed(),
        Column::new("Item", "item_label", Text).computed().hidden(),
    ],
};

const EMPLOYEES: TableDefinition = TableDefinition {
    name: "employees",
    display_name: "Employees",
    table: "employee",
    select: "SELECT e.employee_id, e.employee_surname, e.employee_name, e.employee_patronymic,
                    e.employee_position_id, p.position_name, e.employee_phone, e.employee_email,
                    e.hire_date, e.fire_date,
                    e.employee_surname || ' ' || e.employee_name
                        || COALESCE(' ' || e.employee_patronymic, '') AS full_name
             FROM employee e
             JOIN position p ON p.position_id = e.employee_position_id",
    order_by: "employee_id",
    columns: &[
        Column::new("ID", "employee_id", Integer).id().hidden(),
        Column::new("Surname", "employee_surname", Text),
        Column::new("Name", "employee_name", Text),
        Column::new("Patronymic", "employee_patronymic", Text).optional(),
        Column::new("Position", "position_name", Text)
            .field("employee_position_id")
            .references("positions", "position_id", "position_name"),
        Column::new("Phone", "employee_phone", Text).optional(),
        Column::new("Email", "employee_email", Text).optional(),
        Column::new("Hired", "hire_date", Date).optional(),
        Column::new("Fired", "fire_date", Date).optional(),
        Column::new("Full name", "full_name", Text).computed().hidden(),
    ],
};

const POSITIONS: TableDefinition = TableDefinition {
    name: "positions",
    display_name: "Positions",
    table: "position",
    select: "SELECT position_id, position_name, position_description FROM position",
    order_by: "position_id",
    columns: &[
        Column::new("ID", "position_id", Integer).id().hidden(),
        Column::new("Name", "position_name", Text),
        Column::new("Description", "position_description", Text).optional(),
    ],
};

const SUPPLIER_ORDERS: TableDefinition = TableDefinition {
    name: "supplier-orders",
    display_name: "Supplier orders",
    table: "supplier_order",
    select: "SELECT so.supplier_order_id, so.manager_id,
                    e.employee_surname || ' ' || e.employee_name
                        || COALESCE(' ' || e.employee_patronymic, '') AS manager_full_name,
                    so.recipient_id, s.supplier_name, so.supplier_order_date,
                    so.expected_delivery_date,
                    (SELECT ROUND(COALESCE(SUM(soi.soi_quantity * COALESCE(dt.delivery_price, 0)), 0), 2)
                     FROM supplier_order_item soi
                     LEFT JOIN delivery_term dt ON dt.dt_product_id = soi.soi_product_id
                                               AND dt.dt_supplier_id = so.recipient_id
                     WHERE soi.soi_supplier_order_id = so.supplier_order_id) AS supplier_order_total_amount,
                    so.supplier_order_status, so.supplier_order_description,
                    '#' || so.supplier_order_id || ' ' || s.supplier_name AS order_label
             FROM supplier_order so
             JOIN employee e ON e.employee_id = so.manager_id
             JOIN supplier s ON s.supplier_id = so.recipient_id",
    order_by: "supplier_order_id",
    columns: &[
        Column::new("Order no.", "supplier_order_id", Integer).id(),
        Column::new("Manager", "manager_full_name", Text)
            .field("manager_id")
            .references("employees", "employee_id", "full_name"),
        Column::new("Supplier", "supplier_name", Text)
            .field("recipient_id")
            .references("suppliers", "supplier_id", "supplier_name"),
        Column::new("Ordered", "supplier_order_date", DateTime).defaulted(),
        Column::new("Expected", "expected_delivery_date", Date).optional(),
        Column::new("Total", "supplier_order_total_amount", Decimal).computed(),
        Column::new("Completed", "supplier_order_status", Bool).defaulted(),
        Column::new("Description", "supplier_order_description", Text).optional(),
        Column::new("Order", "order_label", Text).computed().hidden(),
    ],
};

const SUPPLIER_ORDER_ITEMS: TableDefinition = TableDefinition {
    name: "supplier-order-items",
    display_name: "Supplier order items",
    table: "supplier_order_item",
    select: "SELECT soi.soi_supplier_order_id, soi.soi_product_id, p.product_name, soi.soi_quantity
             FROM supplier_order_item soi
             JOIN product p ON p.product_id = soi.soi_product_id",
    order_by: "soi_supplier_order_id, soi_product_id",
    columns: &[
        Column::new("Order no.", "soi_supplier_order_id", Integer).key().references(
            "supplier-orders",
            "supplier_order_id",
            "order_label",
        ),
        Column::new("Product", "product_name", Text)
            .field("soi_product_id")
            .key()
            .references("products", "product_id", "product_name"),
        Column::new("Quantity", "soi_quantity", Integer),
    ],
};

const DELIVERY_TERMS: TableDefinition = TableDefinition {
    name: "delivery-terms",
    display_name: "Delivery terms",
    table: "delivery_term",
    select: "SELECT dt.dt_supplier_id, s.supplier_name, dt.dt_product_id, p.product_name,
                    dt.delivery_price, dt.delivery_days
             FROM delivery_term dt
             JOIN supplier s ON s.supplier_id = dt.dt_supplier_id
             JOIN product p ON p.product_id = dt.dt_product_id",
    order_by: "supplier_name, product_name",
    columns: &[
        Column::new("Supplier", "supplier_name", Text)
            .field("dt_supplier_id")
            .key()
            .references("suppliers", "supplier_id", "supplier_name"),
        Column::new("Product", "product_name", Text)
            .field("dt_product_id")
            .key()
            .references("products", "product_id", "product_name"),
        Column::new("Delivery price", "delivery_price", Decimal),
        Column::new("Delivery days", "delivery_days", Integer),
    ],
};

const STORAGE_CELLS: TableDefinition = TableDefinition {
    name: "storage-cells",
    display_name: "Storage cells",
    table: "storage_cell",
    select: "SELECT cell_id, cell_name, location_description, width, depth, height, max_weight
             FROM storage_cell",
    order_by: "cell_name",
    columns: &[
        Column::new("ID", "cell_id", Integer).id().hidden(),
        Column::new("Cell", "cell_name", Text),
        Column::new("Location", "location_description", Text).optional(),
        Column::new("Width", "width", Decimal),
        Column::new("Depth", "depth", Decimal),
        Column::new("Height", "height", Decimal),
        Column::new("Max weight", "max_weight", Integer).optional(),
    ],
};

const STOCK_ITEMS: TableDefinition = TableDefinition {
    name: "stock-items",
    display_name: "Stock items",
    table: "stock_item",
    select: "SELECT st.stock_batch_item_id,
                    p.product_name || ' (batch ' || bi.bi_batch_id || ')' AS item_label,
                    st.stock_storage_cell_id, sc.cell_name, st.stock_item_quantity
             FROM stock_item st
             JOIN batch_item bi ON bi.batch_item_id = st.stock_batch_item_id
             JOIN product p ON p.product_id = bi.bi_product_id
             JOIN storage_cell sc ON sc.cell_id = st.stock_storage_cell_id",
    order_by: "cell_name, item_label",
    columns: &[
        Column::new("Item", "item_label", Text)
            .field("stock_batch_item_id")
            .key()
            .references("batch-items", "batch_item_id", "item_label"),
        Column::new("Cell", "cell_name", Text)
            .field("stock_storage_cell_id")
            .key()
            .references("storage-cells", "cell_id", "cell_name"),
        Column::new("Quantity", "stock_item_quantity", Integer),
    ],
};

const CUSTOMER_REFUNDS: TableDefinition = TableDefinition {
    name: "customer-refunds",
    display_name: "Customer refunds",
    table: "customer_refund",
    select: "SELECT cr.customer_refund_id, cr.cr_sale_item_id, p.product_name, cr.cr_quantity,
                    cr.refund_date, cr.refund_amount, cr.is_defect
             FROM customer_refund cr
             JOIN sale_item si ON si.sale_item_id = cr.cr_sale_item_id
             JOIN batch_item bi ON bi.batch_item_id = si.si_batch_item_id
             JOIN product p ON p.product_id = bi.bi_product_id",
    order_by: "customer_refund_id",
    columns: &[
        Column::new("ID", "customer_refund_id", Integer).id().hidden(),
        Column::new("Product", "product_name", Text)
            .field("cr_sale_item_id")
            .references("sale-items", "sale_item_id", "item_label"),
        Column::new("Quantity", "cr_quantity", Integer),
        Column::new("Refunded", "refund_date", DateTime).defaulted(),
        Column::new("Amount", "refund_amount", Decimal),
        Column::new("Defective", "is_defect", Bool).defaulted(),
    ],
};

const DEFECTS: TableDefinition = TableDefinition {
    name: "defects",
    display_name: "Defects",
    table: "defect",
    select: "SELECT d.defect_id, d.defect_batch_item_id,
                    p.product_name || ' (batch ' || bi.bi_batch_id || ')' AS item_label,
                    d.defect_quantity, d.detection_date, d.defect_description,
                    '#' || d.defect_id || ' ' || p.product_name AS defect_label
             FROM defect d
             JOIN batch_item bi ON bi.batch_item_id = d.defect_batch_item_id
             JOIN product p ON p.product_id = bi.bi_product_id",
    order_by: "defect_id",
    columns: &[
        Column::new("ID", "defect_id", Integer).id().hidden(),
        Column::new("Item", "item_label", Text)
            .field("defect_batch_item_id")
            .references("batch-items", "batch_item_id", "item_label"),
        Column::new("Quantity", "defect_quantity", Integer),
        Column::new("Detected", "detection_date", DateTime).defaulted(),
        Column::new("Description", "defect_description", Text),
        Column::new("Defect", "defect_label", Text).computed().hidden(),
    ],
};

const SUPPLIER_CONTRACTS: TableDefinition = TableDefinition {
    name: "supplier-contracts",
    display_name: "Supplier contracts",
    table: "supplier_contract",
    select: "SELECT sc.contract_id, sc.contract_supplier_id, s.supplier_name, sc.contract_number,
                    sc.start_date, sc.end_date, sc.terms, sc.discount
             FROM supplier_contract sc
             JOIN supplier s ON s.supplier_id = sc.contract_supplier_id",
    order_by: "contract_id",
    columns: &[
        Column::new("ID", "contract_id", Integer).id().hidden(),
        Column::new("Supplier", "supplier_name", Text)
            .field("contract_supplier_id")
            .references("suppliers", "supplier_id", "supplier_name"),
        Column::new("Contract", "contract_number", Text),
        Column::new("Start", "start_date", Date),
        Column::new("End", "end_date", Date).optional(),
        Column::new("Terms", "terms", Text).optional(),
        Column::new("Discount, %", "discount", Decimal).defaulted(),
    ],
};

const CUSTOMER_ORDERS: TableDefinition = TableDefinition {
    name: "customer-orders",
    display_name: "Customer orders",
    table: "customer_order",
    select: "SELECT co.customer_order_id, co.co_customer_id,
                    c.customer_surname || ' ' || c.customer_name
                        || COALESCE(' ' || c.customer_patronymic, '') AS customer_full_name,
                    co.customer_order_date, co.customer_order_status, co.customer_order_description,
                    '#' || co.customer_order_id || ' ' || c.customer_surname AS order_label
             FROM customer_order co
             JOIN customer c ON c.customer_id = co.co_customer_id",
    order_by: "customer_order_id",
    columns: &[
        Column::new("Order no.", "customer_order_id", Integer).id(),
        Column::new("Customer", "customer_full_name", Text)
            .field("co_customer_id")
            .references("customers", "customer_id", "full_name"),
        Column::new("Ordered", "customer_order_date", DateTime).defaulted(),
        Column::new("Fulfilled", "customer_order_status", Bool).defaulted(),
        Column::new("Description", "customer_order_description", Text).optional(),
        Column::new("Order", "order_label", Text).computed().hidden(),
    ],
};

const CUSTOMER_ORDER_ITEMS: TableDefinition = TableDefinition {
    name: "customer-order-items",
    display_name: "Customer order items",
    table: "customer_order_item",
    select: "SELECT coi.coi_customer_order_id, coi.coi_product_id, p.product_name, coi.coi_quantity
             FROM customer_order_item coi
             JOIN product p ON p.product_id = coi.coi_product_id",
    order_by: "coi_customer_order_id, coi_product_id",
    columns: &[
        Column::new("Order no.", "coi_customer_order_id", Integer).key().references(
            "customer-orders",
            "customer_order_id",
            "order_label",
        ),
        Column::new("Product", "product_name", Text)
            .field("coi_product_id")
            .key()
            .references("products", "product_id", "product_name"),
        Column::new("Quantity", "coi_quantity", Integer),
    ],
};

const SUPPLIER_RETURNS: TableDefinition = TableDefinition {
    name: "supplier-returns",
    display_name: "Supplier returns",
    table: "supplier_return",
    select: "SELECT sr.supplier_return_id, sr.sr_defect_id,
                    '#' || d.defect_id || ' ' || p.product_name AS defect_label,
                    sr.return_date, sr.return_quantity, sr.compensation_amount,
                    sr.replacement_compensation
             FROM supplier_return sr
             JOIN defect d ON d.defect_id = sr.sr_defect_id
             JOIN batch_item bi ON bi.batch_item_id = d.defect_batch_item_id
             JOIN product p ON p.product_id = bi.bi_product_id",
    order_by: "supplier_return_id",
    columns: &[
        Column::new("ID", "supplier_return_id", Integer).id().hidden(),
        Column::new("Defect", "defect_label", Text)
            .field("sr_defect_id")
            .references("defects", "defect_id", "defect_label"),
        Column::new("Returned", "return_date", Date),
        Column::new("Quantity", "return_quantity", Integer),
        Column::new("Compensation", "compensation_amount", Decimal),
        Column::new("Replacement", "replacement_compensation", Bool)
            .optional()
            .defaulted(),
    ],
};

const CUSTOM_PAYMENTS: TableDefinition = TableDefinition {
    name: "custom-payments",
    display_name: "Customs payments",
    table: "custom_payment",
    select: "SELECT cp.custom_payment_id, cp.cp_batch_id, cp.payment_amount, cp.payment_date
             FROM custom_payment cp",
    order_by: "custom_payment_id",
    columns: &[
        Column::new("ID", "custom_payment_id", Integer).id().hidden(),
        Column::new("Batch no.", "cp_batch_id", Integer).references("batches", "batch_id", "batch_id"),
        Column::new("Amount", "payment_amount", Decimal),
        Column::new("Paid", "payment_date", DateTime).defaulted(),
    ],
};
