// ==========================================
// 高校建筑面积缺口测算系统 - 填报记录仓储
// ==========================================
// 表: school_info + special_subsidies（级联删除）
// 红线: Repository 不含业务逻辑，测算结果由调用方传入
// ==========================================

use crate::db::{init_schema, open_sqlite_connection};
use crate::domain::record::{
    OverallStatistics, SchoolRecord, SchoolStatistics, SchoolSubmission, TypeStatistics,
};
use crate::domain::report::GapReport;
use crate::domain::school::{coerce, SpecialSubsidy};
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::Local;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info};

const SCHOOL_COLUMNS: &str = r#"
    id, school_name, school_type, year,
    full_time_undergraduate, full_time_master, full_time_doctor,
    international_undergraduate, international_master, international_doctor, total_students,
    teaching_area, office_area, total_living_area, dormitory_area, logistics_area,
    current_building_area, required_building_area,
    teaching_area_gap, office_area_gap, dormitory_area_gap, other_living_area_gap, logistics_area_gap,
    total_area_gap_with_subsidy, total_area_gap_without_subsidy, special_subsidy_total,
    overall_compliance, calculation_results, remarks, created_at
"#;

/// 未填写学校类型时的统计分组名
pub const UNCLASSIFIED_TYPE: &str = "未分类";

// ==========================================
// SchoolRecordRepository - 填报记录仓储
// ==========================================
pub struct SchoolRecordRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SchoolRecordRepository {
    /// 打开数据库并建表
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        init_schema(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建仓储实例（调用方负责建表）
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 保存一次填报及其测算结果，返回记录 ID
    ///
    /// 主表与特殊补助在同一事务内写入，任一失败整体回滚。
    pub fn insert(&self, submission: &SchoolSubmission, report: &GapReport) -> RepositoryResult<i64> {
        let calculation_results = serde_json::to_string(report)?;
        let input = &submission.input;
        let counts = input.student_counts();
        let existing = input.existing_area();
        let pc = &report.per_category;
        let totals = &report.totals;

        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;

        tx.execute(
            r#"
            INSERT INTO school_info (
                school_name, school_type, year,
                full_time_undergraduate, full_time_master, full_time_doctor,
                international_undergraduate, international_master, international_doctor, total_students,
                teaching_area, office_area, total_living_area, dormitory_area, logistics_area,
                current_building_area, required_building_area,
                teaching_area_gap, office_area_gap, dormitory_area_gap, other_living_area_gap, logistics_area_gap,
                total_area_gap_with_subsidy, total_area_gap_without_subsidy, special_subsidy_total,
                overall_compliance, calculation_results, remarks, created_at
            ) VALUES (
                ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15,
                ?16, ?17, ?18, ?19, ?20, ?21, ?22, ?23, ?24, ?25, ?26, ?27, ?28, ?29
            )
            "#,
            params![
                input.school_name,
                report.resolved_category_label,
                submission.resolved_year(),
                counts.full_time_undergrad,
                counts.full_time_master,
                counts.full_time_doctor,
                counts.intl_undergrad,
                counts.intl_master,
                counts.intl_doctor,
                input.total_students_value(),
                existing.teaching,
                existing.office,
                existing.total_living,
                existing.dormitory,
                existing.logistics,
                totals.existing_sum,
                totals.required_sum,
                pc.teaching.gap,
                pc.office.gap,
                pc.dormitory.gap,
                pc.other_living.gap,
                pc.logistics.gap,
                totals.gap_with_subsidy,
                totals.gap_without_subsidy,
                totals.special_subsidy_total,
                totals.overall_compliant,
                calculation_results,
                submission.remarks,
                Local::now().naive_local(),
            ],
        )?;

        let id = tx.last_insert_rowid();

        {
            let mut stmt = tx.prepare(
                "INSERT INTO special_subsidies (school_info_id, subsidy_name, subsidy_area) VALUES (?1, ?2, ?3)",
            )?;
            for subsidy in &submission.subsidies {
                stmt.execute(params![id, subsidy.name, coerce(Some(subsidy.area))])?;
            }
        }

        tx.commit()?;

        info!(
            id,
            school = %input.school_name,
            year = submission.resolved_year(),
            subsidies = submission.subsidies.len(),
            "填报记录已保存"
        );
        Ok(id)
    }

    /// 历史记录（可按年份筛选），最新在前
    pub fn find_history(&self, year: Option<i32>) -> RepositoryResult<Vec<SchoolRecord>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT {} FROM school_info WHERE (?1 IS NULL OR year = ?1) \
             ORDER BY created_at DESC, id DESC, school_name ASC",
            SCHOOL_COLUMNS
        );
        query_records(&conn, &sql, params![year])
    }

    /// 某校的历史填报，最新在前
    pub fn find_by_school(&self, school_name: &str, limit: usize) -> RepositoryResult<Vec<SchoolRecord>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT {} FROM school_info WHERE school_name = ?1 \
             ORDER BY created_at DESC, id DESC LIMIT ?2",
            SCHOOL_COLUMNS
        );
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        query_records(&conn, &sql, params![school_name, limit])
    }

    /// 每校每年最新一次填报
    pub fn find_latest(
        &self,
        year: Option<i32>,
        school_name: Option<&str>,
    ) -> RepositoryResult<Vec<SchoolRecord>> {
        let conn = self.get_conn()?;
        let sql = format!(
            r#"
            SELECT {} FROM school_info
            WHERE id IN (
                SELECT MAX(id) FROM school_info
                WHERE (?1 IS NULL OR year = ?1) AND (?2 IS NULL OR school_name = ?2)
                GROUP BY school_name, year
            )
            ORDER BY year DESC, school_name ASC
            "#,
            SCHOOL_COLUMNS
        );
        query_records(&conn, &sql, params![year, school_name])
    }

    /// 全部填报（可按年份、学校筛选）
    pub fn find_all(
        &self,
        year: Option<i32>,
        school_name: Option<&str>,
    ) -> RepositoryResult<Vec<SchoolRecord>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT {} FROM school_info \
             WHERE (?1 IS NULL OR year = ?1) AND (?2 IS NULL OR school_name = ?2) \
             ORDER BY school_name ASC, year DESC, created_at DESC, id DESC",
            SCHOOL_COLUMNS
        );
        query_records(&conn, &sql, params![year, school_name])
    }

    /// 已有数据的年份，降序
    pub fn find_available_years(&self) -> RepositoryResult<Vec<i32>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            "SELECT DISTINCT year FROM school_info WHERE year IS NOT NULL ORDER BY year DESC",
        )?;
        let years = stmt
            .query_map([], |row| row.get::<_, i32>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(years)
    }

    /// 记录的特殊补助，按录入顺序
    pub fn find_subsidies(&self, record_id: i64) -> RepositoryResult<Vec<SpecialSubsidy>> {
        let conn = self.get_conn()?;
        load_subsidies(&conn, record_id)
    }

    pub fn find_by_id(&self, id: i64) -> RepositoryResult<Option<SchoolRecord>> {
        let conn = self.get_conn()?;
        let sql = format!("SELECT {} FROM school_info WHERE id = ?1", SCHOOL_COLUMNS);
        let record = conn
            .query_row(&sql, params![id], map_school_row)
            .optional()?;

        match record {
            Some(mut record) => {
                record.special_subsidies = load_subsidies(&conn, record.id)?;
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }

    /// 删除记录及其特殊补助
    pub fn delete(&self, id: i64) -> RepositoryResult<()> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;

        tx.execute("DELETE FROM special_subsidies WHERE school_info_id = ?1", params![id])?;
        let affected = tx.execute("DELETE FROM school_info WHERE id = ?1", params![id])?;

        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "填报记录".to_string(),
                id: id.to_string(),
            });
        }

        tx.commit()?;
        info!(id, "填报记录已删除");
        Ok(())
    }

    /// 清空全部填报，返回删除的记录数
    pub fn clear_all(&self) -> RepositoryResult<usize> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;

        tx.execute("DELETE FROM special_subsidies", [])?;
        let deleted = tx.execute("DELETE FROM school_info", [])?;
        // 重置自增 ID
        tx.execute(
            "DELETE FROM sqlite_sequence WHERE name IN ('school_info', 'special_subsidies')",
            [],
        )?;

        tx.commit()?;
        info!(deleted, "已清空全部填报记录");
        Ok(deleted)
    }

    /// 汇总统计（可按年份筛选）
    pub fn statistics(&self, year: Option<i32>) -> RepositoryResult<SchoolStatistics> {
        let conn = self.get_conn()?;

        let overall = conn.query_row(
            r#"
            SELECT
                COUNT(*),
                COALESCE(SUM(total_students), 0),
                COALESCE(SUM(current_building_area), 0),
                COALESCE(SUM(required_building_area), 0),
                COALESCE(SUM(total_area_gap_with_subsidy), 0),
                COALESCE(SUM(CASE WHEN overall_compliance = 1 THEN 1 ELSE 0 END), 0),
                AVG(total_students),
                AVG(current_building_area),
                MIN(year),
                MAX(year)
            FROM school_info
            WHERE (?1 IS NULL OR year = ?1)
            "#,
            params![year],
            |row| {
                Ok(OverallStatistics {
                    total_schools: row.get(0)?,
                    total_students: row.get(1)?,
                    total_current_area: row.get(2)?,
                    total_required_area: row.get(3)?,
                    total_gap: row.get(4)?,
                    compliant_schools: row.get(5)?,
                    avg_students: row.get(6)?,
                    avg_current_area: row.get(7)?,
                    earliest_year: row.get(8)?,
                    latest_year: row.get(9)?,
                })
            },
        )?;

        let mut stmt = conn.prepare(
            r#"
            SELECT
                COALESCE(school_type, ?2) AS type_name,
                COUNT(*) AS count,
                COALESCE(SUM(total_students), 0),
                COALESCE(SUM(current_building_area), 0),
                COALESCE(SUM(required_building_area), 0),
                COALESCE(SUM(total_area_gap_with_subsidy), 0)
            FROM school_info
            WHERE (?1 IS NULL OR year = ?1)
            GROUP BY type_name
            ORDER BY count DESC, type_name ASC
            "#,
        )?;
        let by_type = stmt
            .query_map(params![year, UNCLASSIFIED_TYPE], |row| {
                Ok(TypeStatistics {
                    school_type: row.get(0)?,
                    count: row.get(1)?,
                    students: row.get(2)?,
                    current_area: row.get(3)?,
                    required_area: row.get(4)?,
                    gap: row.get(5)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        debug!(total = overall.total_schools, types = by_type.len(), "统计完成");
        Ok(SchoolStatistics { overall, by_type })
    }
}

// ==========================================
// 行映射
// ==========================================

fn query_records(
    conn: &Connection,
    sql: &str,
    params: impl rusqlite::Params,
) -> RepositoryResult<Vec<SchoolRecord>> {
    let mut stmt = conn.prepare(sql)?;
    let mut records = stmt
        .query_map(params, map_school_row)?
        .collect::<Result<Vec<_>, _>>()?;

    for record in &mut records {
        record.special_subsidies = load_subsidies(conn, record.id)?;
    }
    Ok(records)
}

fn load_subsidies(conn: &Connection, record_id: i64) -> RepositoryResult<Vec<SpecialSubsidy>> {
    let mut stmt = conn.prepare_cached(
        "SELECT subsidy_name, subsidy_area FROM special_subsidies WHERE school_info_id = ?1 ORDER BY id",
    )?;
    let subsidies = stmt
        .query_map(params![record_id], |row| {
            Ok(SpecialSubsidy {
                name: row.get(0)?,
                area: row.get(1)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(subsidies)
}

fn map_school_row(row: &Row<'_>) -> rusqlite::Result<SchoolRecord> {
    Ok(SchoolRecord {
        id: row.get(0)?,
        school_name: row.get(1)?,
        school_type: row.get(2)?,
        year: row.get(3)?,
        full_time_undergraduate: row.get(4)?,
        full_time_master: row.get(5)?,
        full_time_doctor: row.get(6)?,
        international_undergraduate: row.get(7)?,
        international_master: row.get(8)?,
        international_doctor: row.get(9)?,
        total_students: row.get(10)?,
        teaching_area: row.get(11)?,
        office_area: row.get(12)?,
        total_living_area: row.get(13)?,
        dormitory_area: row.get(14)?,
        logistics_area: row.get(15)?,
        current_building_area: row.get(16)?,
        required_building_area: row.get(17)?,
        teaching_area_gap: row.get(18)?,
        office_area_gap: row.get(19)?,
        dormitory_area_gap: row.get(20)?,
        other_living_area_gap: row.get(21)?,
        logistics_area_gap: row.get(22)?,
        total_area_gap_with_subsidy: row.get(23)?,
        total_area_gap_without_subsidy: row.get(24)?,
        special_subsidy_total: row.get(25)?,
        overall_compliance: row.get(26)?,
        calculation_results: row.get(27)?,
        remarks: row.get(28)?,
        created_at: row.get(29)?,
        special_subsidies: Vec::new(),
    })
}
