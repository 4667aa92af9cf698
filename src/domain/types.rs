// ==========================================
// 田径运动会分组编排系统 - 领域类型定义
// ==========================================
// 职责: 性别、年龄组、项目类型、分组状态等枚举
// 序列化格式: 与存储的分组 JSON 保持一致
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==========================================
// 性别 (Gender)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "F")]
    Female,
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gender::Male => write!(f, "M"),
            Gender::Female => write!(f, "F"),
        }
    }
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "M" | "MALE" | "BOYS" => Ok(Gender::Male),
            "F" | "FEMALE" | "GIRLS" => Ok(Gender::Female),
            other => Err(format!("未知性别: {}", other)),
        }
    }
}

// ==========================================
// 年龄组 (Age Category)
// ==========================================
// Open 组不拆分分组，也不做学校均衡
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgeCategory {
    U9,
    U11,
    U13,
    U15,
    Open,
}

impl AgeCategory {
    pub fn is_open(&self) -> bool {
        matches!(self, AgeCategory::Open)
    }

    /// 宽松解析年龄组文本（报名表中的自由文本）
    ///
    /// 规则：
    /// 1) 含 "OPEN"（如 "Boys Open"）→ Open
    /// 2) 依次匹配 U9 / U11 / U13 / U15
    /// 3) 均不匹配 → Open
    pub fn parse_lenient(text: &str) -> Self {
        let normalized = text.trim().to_uppercase();

        if normalized.contains("OPEN") {
            return AgeCategory::Open;
        }

        [
            ("U9", AgeCategory::U9),
            ("U11", AgeCategory::U11),
            ("U13", AgeCategory::U13),
            ("U15", AgeCategory::U15),
        ]
        .into_iter()
        .find(|(token, _)| normalized.contains(token))
        .map(|(_, category)| category)
        .unwrap_or(AgeCategory::Open)
    }
}

impl fmt::Display for AgeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AgeCategory::U9 => write!(f, "U9"),
            AgeCategory::U11 => write!(f, "U11"),
            AgeCategory::U13 => write!(f, "U13"),
            AgeCategory::U15 => write!(f, "U15"),
            AgeCategory::Open => write!(f, "Open"),
        }
    }
}

// ==========================================
// 项目类型 (Event Type)
// ==========================================
// 决定走接力分组还是个人分组
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    Track, // 径赛
    Field, // 田赛
    Relay, // 接力
}

impl EventType {
    /// 按项目名推断类型：名称含 "relay" 视为接力，其余默认径赛
    pub fn infer_from_name(name: &str) -> Self {
        if name.to_lowercase().contains("relay") {
            EventType::Relay
        } else {
            EventType::Track
        }
    }

    pub fn is_relay(&self) -> bool {
        matches!(self, EventType::Relay)
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventType::Track => write!(f, "track"),
            EventType::Field => write!(f, "field"),
            EventType::Relay => write!(f, "relay"),
        }
    }
}

// ==========================================
// 分组类别 (Heat Kind)
// ==========================================
// 个人分组的道次占用者是运动员，接力分组的是学校
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeatKind {
    Individual,
    Relay,
}

impl From<EventType> for HeatKind {
    fn from(event_type: EventType) -> Self {
        if event_type.is_relay() {
            HeatKind::Relay
        } else {
            HeatKind::Individual
        }
    }
}

impl fmt::Display for HeatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeatKind::Individual => write!(f, "individual"),
            HeatKind::Relay => write!(f, "relay"),
        }
    }
}

// ==========================================
// 分组状态 (Heat Status)
// ==========================================
// 目前只有 pending 可达
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeatStatus {
    #[default]
    Pending,
}

impl fmt::Display for HeatStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeatStatus::Pending => write!(f, "pending"),
        }
    }
}
