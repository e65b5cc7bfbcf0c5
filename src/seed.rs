//! Demo catalog: the administrator account, four categories, thirteen books
//! and two comments. Running it again leaves existing rows alone.

use chrono::Local;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    Set,
};
use sea_orm::ActiveValue::NotSet;

use crate::{
    entity::{
        category::{ActiveModel as CategoryActive, Column as CategoryCol, Entity as Categories},
        comment::{ActiveModel as CommentActive, Entity as Comments},
        product::{ActiveModel as ProductActive, Column as ProdCol, Entity as Products},
        users::{ActiveModel as UserActive, Column as UserCol, Entity as Users, UserRole},
    },
    services::auth_service::hash_password,
};

const IMAGE_BASE: &str = "https://res.cloudinary.com/dkfnlesea/image/upload";

const CATEGORIES: [&str; 4] = [
    "Sách Bán Chạy",
    "Khoa Học/Học Thuật",
    "Tiểu Thuyết/Truyện",
    "Kỹ Năng Sống",
];

/// (name, author, price, image path, category index)
const BOOKS: [(&str, &str, i64, &str, usize); 13] = [
    ("Đắc Nhân Tâm", "Dale Carnegie", 90000, "v1671507163/Dac-nhan-tam_epv70i.jpg", 0),
    (
        "Atomic Habits - Thay Đổi Tí Hon, Hiệu Quả Bất Ngờ",
        "James Clear",
        110000,
        "v1671507321/8932000131182_lqitam.jpg",
        0,
    ),
    ("21 Bài Học Cho Thế Kỷ 21", "Yuval Noah Harari", 120000, "v1671509309/21baihoc_x8cegj.jpg", 0),
    (
        "Cẩm Nang Scrum Cho Người Mới Bắt Đầu",
        "Học Viện Agile",
        89000,
        "v1671507475/camnangscrum_mg5ly1.jpg",
        1,
    ),
    ("Súng, Vi trùng và Thép", "Jared Diamond", 79000, "v1671509314/sungvitrungthep_uscelx.jpg", 1),
    ("Lược sử thời gian", "Stephen Hawking", 130000, "v1671509448/luocsuthoigian_s4n1ah.jpg", 1),
    (
        "Cây Cam Ngọt Của Tôi",
        "José Mauro de Vasconcelos",
        99000,
        "v1671507810/caycamngot_of4lsr.jpg",
        2,
    ),
    ("Hai Số Phận", "Jeffrey Archer", 109000, "v1671507813/Hai-So-Phan_oebfap.jpg", 2),
    ("Rừng Na Uy", "Haruki Murakami", 145000, "v1671507951/rungnauy_t57s68.jpg", 2),
    ("Điểm Đến Của Cuộc Đời", "Đặng Hoàng Giang", 75000, "v1671507956/diemdencuocdoi_fuvyky.jpg", 3),
    (
        "Đánh Thức Con Người Phi Thường Trong Bạn",
        "Anthony Robbins",
        85000,
        "v1671509450/danhthucconng_rdfiv6.jpg",
        3,
    ),
    (
        "Giới Hạn Của Bạn Chỉ Là Xuất Phát Điểm Của Tôi",
        "Mèo Maverick",
        95000,
        "v1671509453/gioihancuaban_zgdwi7.jpg",
        3,
    ),
    ("Nguyên lý 80/20", "Richard Koch", 65000, "v1671508271/nguyen-ly-2080_w3ck5d.jpg", 3),
];

const COMMENTS: [&str; 2] = ["Cuốn sách tuyệt vời!", "Hay cực."];

pub struct SeedReport {
    pub admin_id: i32,
    pub categories: usize,
    pub products: usize,
}

pub async fn run(orm: &DatabaseConnection) -> anyhow::Result<SeedReport> {
    let admin_id = ensure_admin(orm, "admin", "123456").await?;

    let mut category_ids = Vec::with_capacity(CATEGORIES.len());
    for name in CATEGORIES {
        category_ids.push(ensure_category(orm, name).await?);
    }

    let mut first_product = None;
    for (name, author, price, image, category) in BOOKS {
        let id = ensure_product(orm, name, author, price, image, category_ids[category]).await?;
        first_product.get_or_insert(id);
    }

    if let Some(product_id) = first_product {
        if Comments::find().count(orm).await? == 0 {
            for content in COMMENTS {
                CommentActive {
                    id: NotSet,
                    content: Set(content.to_string()),
                    created_date: Set(Local::now().naive_local()),
                    user_id: Set(admin_id),
                    product_id: Set(product_id),
                }
                .insert(orm)
                .await?;
            }
        }
    }

    Ok(SeedReport {
        admin_id,
        categories: category_ids.len(),
        products: BOOKS.len(),
    })
}

async fn ensure_admin(orm: &DatabaseConnection, username: &str, password: &str) -> anyhow::Result<i32> {
    if let Some(existing) = Users::find()
        .filter(UserCol::Username.eq(username))
        .one(orm)
        .await?
    {
        return Ok(existing.id);
    }

    let user = UserActive {
        id: NotSet,
        name: Set("Taio".to_string()),
        username: Set(username.to_string()),
        password: Set(hash_password(password).map_err(|e| anyhow::anyhow!(e.to_string()))?),
        image: Set(format!("{IMAGE_BASE}/v1671509611/adminnn_sbxqg3.jpg")),
        active: Set(true),
        user_role: Set(UserRole::Admin),
    }
    .insert(orm)
    .await?;

    tracing::info!(user_id = user.id, "seeded admin {username}");
    Ok(user.id)
}

async fn ensure_category(orm: &DatabaseConnection, name: &str) -> anyhow::Result<i32> {
    if let Some(existing) = Categories::find()
        .filter(CategoryCol::Name.eq(name))
        .one(orm)
        .await?
    {
        return Ok(existing.id);
    }
    let category = CategoryActive {
        id: NotSet,
        name: Set(name.to_string()),
    }
    .insert(orm)
    .await?;
    Ok(category.id)
}

async fn ensure_product(
    orm: &DatabaseConnection,
    name: &str,
    author: &str,
    price: i64,
    image: &str,
    category_id: i32,
) -> anyhow::Result<i32> {
    if let Some(existing) = Products::find()
        .filter(ProdCol::Name.eq(name))
        .one(orm)
        .await?
    {
        return Ok(existing.id);
    }
    let product = ProductActive {
        id: NotSet,
        name: Set(name.to_string()),
        author: Set(Some(author.to_string())),
        price: Set(price),
        image: Set(Some(format!("{IMAGE_BASE}/{image}"))),
        active: Set(true),
        category_id: Set(category_id),
    }
    .insert(orm)
    .await?;
    Ok(product.id)
}
