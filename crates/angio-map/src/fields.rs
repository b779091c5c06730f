//! Canonical field registry with known column-name aliases.
//!
//! The alias lists cover the column spellings seen across real exports:
//! English, pinyin-free Chinese, abbreviations, and the registry-style
//! `subjid`/`stsex` names used by wide segment tables. The declaration order
//! of [`CanonicalField::ALL`] is the claim order during mapping and is a
//! documented tie-break: identifier and demographic fields claim columns
//! before lesion-feature fields do.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum CanonicalField {
    PatientId,
    Age,
    Gender,
    Vessel,
    StenosisPercent,
    Location,
    Diabetes,
    Hypertension,
    Hyperlipidemia,
    Smoking,
    FamilyHistory,
    EjectionFraction,
    CreatinineMgDl,
    LengthMm,
    IsBifurcation,
    IsCalcified,
    IsOstial,
    IsTortuous,
    IsCto,
    ThrombusPresent,
}

impl CanonicalField {
    pub const ALL: [CanonicalField; 20] = [
        CanonicalField::PatientId,
        CanonicalField::Age,
        CanonicalField::Gender,
        CanonicalField::Vessel,
        CanonicalField::StenosisPercent,
        CanonicalField::Location,
        CanonicalField::Diabetes,
        CanonicalField::Hypertension,
        CanonicalField::Hyperlipidemia,
        CanonicalField::Smoking,
        CanonicalField::FamilyHistory,
        CanonicalField::EjectionFraction,
        CanonicalField::CreatinineMgDl,
        CanonicalField::LengthMm,
        CanonicalField::IsBifurcation,
        CanonicalField::IsCalcified,
        CanonicalField::IsOstial,
        CanonicalField::IsTortuous,
        CanonicalField::IsCto,
        CanonicalField::ThrombusPresent,
    ];

    /// Canonical snake_case name, also the preferred output column name.
    pub fn name(&self) -> &'static str {
        match self {
            CanonicalField::PatientId => "patient_id",
            CanonicalField::Age => "age",
            CanonicalField::Gender => "gender",
            CanonicalField::Vessel => "vessel",
            CanonicalField::StenosisPercent => "stenosis_percent",
            CanonicalField::Location => "location",
            CanonicalField::Diabetes => "diabetes",
            CanonicalField::Hypertension => "hypertension",
            CanonicalField::Hyperlipidemia => "hyperlipidemia",
            CanonicalField::Smoking => "smoking",
            CanonicalField::FamilyHistory => "family_history",
            CanonicalField::EjectionFraction => "ejection_fraction",
            CanonicalField::CreatinineMgDl => "creatinine_mg_dl",
            CanonicalField::LengthMm => "length_mm",
            CanonicalField::IsBifurcation => "is_bifurcation",
            CanonicalField::IsCalcified => "is_calcified",
            CanonicalField::IsOstial => "is_ostial",
            CanonicalField::IsTortuous => "is_tortuous",
            CanonicalField::IsCto => "is_cto",
            CanonicalField::ThrombusPresent => "thrombus_present",
        }
    }

    /// Known aliases, canonical name first.
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            CanonicalField::PatientId => &[
                "patient_id", "patientid", "subjid", "id", "患者id", "病例号", "住院号",
                "门诊号", "病历号", "编号", "入组编号", "case_id", "caseid", "number",
                "no", "序号",
            ],
            CanonicalField::Age => &[
                "age", "sys_currentage", "当前年龄", "年龄", "years", "yr", "years_old",
                "岁",
            ],
            CanonicalField::Gender => &[
                "gender", "sex", "stsex", "性别", "男女", "male_female", "gender_mf",
            ],
            CanonicalField::Vessel => &[
                "vessel", "artery", "血管", "病变血管", "靶血管", "罪犯血管",
                "主要病变血管", "target_vessel", "culprit_vessel", "main_vessel",
                "血管名称",
            ],
            CanonicalField::StenosisPercent => &[
                "stenosis", "stenosis_percent", "狭窄", "狭窄度", "狭窄百分比",
                "狭窄程度", "narrowing", "狭窄率",
            ],
            CanonicalField::Location => &[
                "location", "position", "位置", "部位", "节段", "segment", "病变位置",
                "狭窄位置", "lesion_location",
            ],
            CanonicalField::Diabetes => &["diabetes", "dm", "糖尿病", "diabetic"],
            CanonicalField::Hypertension => &[
                "hypertension", "htn", "高血压", "blood_pressure",
            ],
            CanonicalField::Hyperlipidemia => &[
                "hyperlipidemia", "高脂血症", "血脂", "胆固醇", "cholesterol",
            ],
            CanonicalField::Smoking => &["smoking", "smoke", "吸烟", "烟草", "tobacco", "抽烟"],
            CanonicalField::FamilyHistory => &[
                "family_history", "家族史", "冠心病家族史", "fh",
            ],
            CanonicalField::EjectionFraction => &[
                "ef", "ejection_fraction", "lvef", "射血分数", "左室射血分数", "心功能",
            ],
            CanonicalField::CreatinineMgDl => &[
                "creatinine", "cr", "scr", "肌酐", "血肌酐", "血清肌酐", "creat",
            ],
            CanonicalField::LengthMm => &[
                "length", "lesion_length", "长度", "病变长度", "狭窄长度",
            ],
            CanonicalField::IsBifurcation => &[
                "bifurcation", "分叉", "分岔", "分支", "bifur",
            ],
            CanonicalField::IsCalcified => &["calcified", "calcification", "钙化", "钙质"],
            CanonicalField::IsOstial => &["ostial", "ostium", "开口", "起始", "入口"],
            CanonicalField::IsTortuous => &[
                "tortuous", "tortuosity", "迂曲", "扭曲", "弯曲",
            ],
            CanonicalField::IsCto => &[
                "cto", "完全闭塞", "慢性闭塞", "闭塞", "total_occlusion",
                "chronic_occlusion",
            ],
            CanonicalField::ThrombusPresent => &[
                "thrombus", "clot", "血栓", "血凝块", "thrombosis",
            ],
        }
    }
}

impl fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
