use crate::db::models::{AboutPage, DbUser, HomePage, Post, Project};
use crate::db::schema::SQLITE_INIT;
use crate::error::SiteError;
use sqlx::{Pool, Sqlite};

pub type SqlitePool = Pool<Sqlite>;

const USER_COLUMNS: &str = "id, username, password_hash, google_id, email, is_admin";

#[derive(Clone)]
pub struct SiteStorage {
    pool: SqlitePool,
}

impl SiteStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Initialize the schema by executing the bundled DDL.
    pub async fn init_schema(&self) -> Result<(), SiteError> {
        // sqlx::query runs one statement at a time
        for stmt in SQLITE_INIT.split(';') {
            let s = stmt.trim();
            if s.is_empty() {
                continue;
            }
            sqlx::query(s).execute(&self.pool).await?;
        }
        Ok(())
    }

    // ----------------- Users -----------------

    pub async fn get_user(&self, id: i64) -> Result<Option<DbUser>, SiteError> {
        let user = sqlx::query_as::<_, DbUser>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<DbUser>, SiteError> {
        let user = sqlx::query_as::<_, DbUser>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = ?"
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    /// Insert a user with a local password credential. Returns the row id.
    pub async fn insert_local_user(
        &self,
        username: &str,
        password_hash: &str,
        is_admin: bool,
    ) -> Result<i64, SiteError> {
        let res = sqlx::query(
            "INSERT INTO users (username, password_hash, is_admin) VALUES (?, ?, ?)",
        )
        .bind(username)
        .bind(password_hash)
        .bind(is_admin)
        .execute(&self.pool)
        .await?;
        Ok(res.last_insert_rowid())
    }

    /// Look up a user by Google subject id, creating it when absent.
    ///
    /// A newly created user is an admin only if the table was empty; the
    /// emptiness check and the insert are one statement, so two racing
    /// first logins cannot both become admin. Existing users keep their
    /// admin flag and get their email refreshed.
    pub async fn upsert_google_user(
        &self,
        google_id: &str,
        email: Option<&str>,
    ) -> Result<DbUser, SiteError> {
        let user = sqlx::query_as::<_, DbUser>(&format!(
            r#"
            INSERT INTO users (google_id, email, is_admin)
            VALUES (?, ?, NOT EXISTS (SELECT 1 FROM users))
            ON CONFLICT(google_id) DO UPDATE SET
                email = COALESCE(excluded.email, users.email)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(google_id)
        .bind(email)
        .fetch_one(&self.pool)
        .await?;
        Ok(user)
    }

    // ----------------- Posts -----------------

    /// Newest first; `limit = None` returns every post.
    pub async fn list_posts(&self, limit: Option<i64>) -> Result<Vec<Post>, SiteError> {
        let posts = sqlx::query_as::<_, Post>(
            "SELECT id, title, content, date_posted FROM posts ORDER BY id DESC LIMIT ?",
        )
        .bind(limit.unwrap_or(-1))
        .fetch_all(&self.pool)
        .await?;
        Ok(posts)
    }

    pub async fn get_post(&self, id: i64) -> Result<Option<Post>, SiteError> {
        let post = sqlx::query_as::<_, Post>(
            "SELECT id, title, content, date_posted FROM posts WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(post)
    }

    pub async fn insert_post(
        &self,
        title: &str,
        content: &str,
        date_posted: &str,
    ) -> Result<i64, SiteError> {
        let res = sqlx::query("INSERT INTO posts (title, content, date_posted) VALUES (?, ?, ?)")
            .bind(title)
            .bind(content)
            .bind(date_posted)
            .execute(&self.pool)
            .await?;
        Ok(res.last_insert_rowid())
    }

    pub async fn update_post(&self, id: i64, title: &str, content: &str) -> Result<(), SiteError> {
        let res = sqlx::query("UPDATE posts SET title = ?, content = ? WHERE id = ?")
            .bind(title)
            .bind(content)
            .bind(id)
            .execute(&self.pool)
            .await?;
        if res.rows_affected() == 0 {
            return Err(SiteError::NotFound);
        }
        Ok(())
    }

    pub async fn delete_post(&self, id: i64) -> Result<(), SiteError> {
        let res = sqlx::query("DELETE FROM posts WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if res.rows_affected() == 0 {
            return Err(SiteError::NotFound);
        }
        Ok(())
    }

    // ----------------- Projects -----------------

    pub async fn list_projects(&self) -> Result<Vec<Project>, SiteError> {
        let projects = sqlx::query_as::<_, Project>(
            "SELECT id, description, image_file FROM projects ORDER BY id DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(projects)
    }

    pub async fn get_project(&self, id: i64) -> Result<Option<Project>, SiteError> {
        let project = sqlx::query_as::<_, Project>(
            "SELECT id, description, image_file FROM projects WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(project)
    }

    pub async fn insert_project(
        &self,
        description: &str,
        image_file: Option<&str>,
    ) -> Result<i64, SiteError> {
        let res = sqlx::query("INSERT INTO projects (description, image_file) VALUES (?, ?)")
            .bind(description)
            .bind(image_file)
            .execute(&self.pool)
            .await?;
        Ok(res.last_insert_rowid())
    }

    pub async fn update_project(&self, project: &Project) -> Result<(), SiteError> {
        let res = sqlx::query("UPDATE projects SET description = ?, image_file = ? WHERE id = ?")
            .bind(&project.description)
            .bind(project.image_file.as_deref())
            .bind(project.id)
            .execute(&self.pool)
            .await?;
        if res.rows_affected() == 0 {
            return Err(SiteError::NotFound);
        }
        Ok(())
    }

    pub async fn delete_project(&self, id: i64) -> Result<(), SiteError> {
        let res = sqlx::query("DELETE FROM projects WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if res.rows_affected() == 0 {
            return Err(SiteError::NotFound);
        }
        Ok(())
    }

    // ----------------- Singleton pages -----------------

    pub async fn home_page(&self) -> Result<Option<HomePage>, SiteError> {
        let page = sqlx::query_as::<_, HomePage>(
            "SELECT id, intro_title, intro_subtitle, profile_pic FROM home_page ORDER BY id LIMIT 1",
        )
        .fetch_optional(&self.pool)
        .await?;
        Ok(page)
    }

    /// Fetch the home page row, inserting the defaults first if the table is empty.
    pub async fn home_page_or_create(&self) -> Result<HomePage, SiteError> {
        let defaults = HomePage::defaults();
        sqlx::query(
            r#"
            INSERT INTO home_page (intro_title, intro_subtitle, profile_pic)
            SELECT ?, ?, ?
            WHERE NOT EXISTS (SELECT 1 FROM home_page)
            "#,
        )
        .bind(&defaults.intro_title)
        .bind(&defaults.intro_subtitle)
        .bind(defaults.profile_pic.as_deref())
        .execute(&self.pool)
        .await?;
        self.home_page().await?.ok_or(SiteError::NotFound)
    }

    pub async fn update_home_page(&self, page: &HomePage) -> Result<(), SiteError> {
        sqlx::query(
            "UPDATE home_page SET intro_title = ?, intro_subtitle = ?, profile_pic = ? WHERE id = ?",
        )
        .bind(&page.intro_title)
        .bind(&page.intro_subtitle)
        .bind(page.profile_pic.as_deref())
        .bind(page.id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn about_page(&self) -> Result<Option<AboutPage>, SiteError> {
        let page = sqlx::query_as::<_, AboutPage>(
            "SELECT id, bio_text, skills FROM about_page ORDER BY id LIMIT 1",
        )
        .fetch_optional(&self.pool)
        .await?;
        Ok(page)
    }

    /// Fetch the about page row, inserting the defaults first if the table is empty.
    pub async fn about_page_or_create(&self) -> Result<AboutPage, SiteError> {
        let defaults = AboutPage::defaults();
        sqlx::query(
            r#"
            INSERT INTO about_page (bio_text, skills)
            SELECT ?, ?
            WHERE NOT EXISTS (SELECT 1 FROM about_page)
            "#,
        )
        .bind(&defaults.bio_text)
        .bind(&defaults.skills)
        .execute(&self.pool)
        .await?;
        self.about_page().await?.ok_or(SiteError::NotFound)
    }

    pub async fn update_about_page(&self, page: &AboutPage) -> Result<(), SiteError> {
        sqlx::query("UPDATE about_page SET bio_text = ?, skills = ? WHERE id = ?")
            .bind(&page.bio_text)
            .bind(&page.skills)
            .bind(page.id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
