// Backend request/response models
use std::fmt;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::error::SeaBlockError;

/// Untyped record as returned by the backend, field order preserved
pub type Row = Map<String, Value>;

/// Freshness label the verification service assigns to unusable batches
pub const SPOILED_LABEL: &str = "Spoiled";

/// Micro-Algos per Algo
const MICRO_ALGOS: u64 = 1_000_000;

/// Accepts a JSON number or a numeric string (Postgres NUMERIC columns arrive as strings)
fn deserialize_lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| serde::de::Error::custom("number out of range")),
        Value::String(s) => s.trim().parse::<f64>().map_err(serde::de::Error::custom),
        Value::Null => Ok(0.0),
        other => Err(serde::de::Error::custom(format!(
            "expected number, got {}",
            other
        ))),
    }
}

fn deserialize_lenient_opt_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::Number(n) => Ok(n.as_f64()),
        Value::String(s) if s.trim().is_empty() => Ok(None),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        other => Err(serde::de::Error::custom(format!(
            "expected number, got {}",
            other
        ))),
    }
}

/// Ids are strings in some tables and serial integers in others
fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Null => Ok(String::new()),
        other => Err(serde::de::Error::custom(format!(
            "expected id, got {}",
            other
        ))),
    }
}

fn deserialize_opt_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(Some(s)),
        Value::Number(n) => Ok(Some(n.to_string())),
        _ => Ok(None),
    }
}

fn deserialize_micro_algos<'de, D>(deserializer: D) -> Result<Option<AlgoBalance>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(deserialize_lenient_opt_f64(deserializer)?.map(|v| AlgoBalance::from_micro(v as u64)))
}

/// The six roles a SeaBlock user can log in as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Customer,
    Supplier,
    Company,
    Distributor,
    Regulatory,
    Admin,
}

impl Role {
    pub const ALL: [Role; 6] = [
        Role::Customer,
        Role::Supplier,
        Role::Company,
        Role::Distributor,
        Role::Regulatory,
        Role::Admin,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Customer => "Customer",
            Role::Supplier => "Supplier",
            Role::Company => "Company",
            Role::Distributor => "Distributor",
            Role::Regulatory => "Regulatory",
            Role::Admin => "Admin",
        }
    }

    /// Prefix of user ids created for this role
    pub fn id_prefix(&self) -> char {
        match self {
            Role::Supplier => 'S',
            Role::Company => 'C',
            Role::Distributor => 'D',
            Role::Regulatory => 'R',
            Role::Customer | Role::Admin => 'X',
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = SeaBlockError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| SeaBlockError::Validation("Unknown role".to_string()))
    }
}

/// A registered user as listed on the admin page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub wallet_address: String,
    #[serde(default, deserialize_with = "deserialize_id")]
    pub phone_no: String,
    pub role: Role,
    #[serde(default)]
    pub license: Option<String>,
}

/// User payload returned by the login endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct LoginUser {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub username: String,
    pub role: Role,
    #[serde(default)]
    pub wallet_address: Option<String>,
    #[serde(default)]
    pub mnemonic: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    pub user: Option<LoginUser>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Environmental readings taken for a batch.
/// Joined views leave them out, so each one defaults to zero.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SensorReadings {
    #[serde(default, deserialize_with = "deserialize_lenient_f64")]
    pub dissolved_oxygen: f64,
    #[serde(default, deserialize_with = "deserialize_lenient_f64")]
    pub temperature: f64,
    #[serde(default, deserialize_with = "deserialize_lenient_f64")]
    pub ph_level: f64,
    #[serde(default, deserialize_with = "deserialize_lenient_f64")]
    pub ammonia: f64,
    #[serde(default, deserialize_with = "deserialize_lenient_f64")]
    pub metals: f64,
    #[serde(default, deserialize_with = "deserialize_lenient_f64")]
    pub bacteria: f64,
}

/// Inclusive bounds of the record form sliders
pub mod bounds {
    pub const QUANTITY: (f64, f64) = (1.0, 100.0);
    pub const DISSOLVED_OXYGEN: (f64, f64) = (0.0, 20.0);
    pub const TEMPERATURE: (f64, f64) = (-20.0, 30.0);
    pub const PH_LEVEL: (f64, f64) = (5.0, 10.0);
    pub const AMMONIA: (f64, f64) = (0.0, 10.0);
    pub const METALS: (f64, f64) = (0.0, 10.0);
    pub const BACTERIA: (f64, f64) = (0.0, 100.0);
}

/// Readings as the forms submit them: each value truncated to an integer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SubmittedReadings {
    pub dissolved_oxygen: i64,
    pub temperature: i64,
    pub ph_level: i64,
    pub ammonia: i64,
    pub metals: i64,
    pub bacteria: i64,
}

impl SensorReadings {
    pub fn submitted(&self) -> SubmittedReadings {
        SubmittedReadings {
            dissolved_oxygen: self.dissolved_oxygen.trunc() as i64,
            temperature: self.temperature.trunc() as i64,
            ph_level: self.ph_level.trunc() as i64,
            ammonia: self.ammonia.trunc() as i64,
            metals: self.metals.trunc() as i64,
            bacteria: self.bacteria.trunc() as i64,
        }
    }

    /// Rejects readings outside the slider ranges
    pub fn validate(&self) -> Result<(), SeaBlockError> {
        let checks = [
            ("Dissolved oxygen", self.dissolved_oxygen, bounds::DISSOLVED_OXYGEN),
            ("Temperature", self.temperature, bounds::TEMPERATURE),
            ("pH level", self.ph_level, bounds::PH_LEVEL),
            ("Ammonia", self.ammonia, bounds::AMMONIA),
            ("Metals", self.metals, bounds::METALS),
            ("Bacteria", self.bacteria, bounds::BACTERIA),
        ];
        for (name, value, (min, max)) in checks {
            if !value.is_finite() || value < min || value > max {
                return Err(SeaBlockError::Validation(format!(
                    "{} must be between {} and {}",
                    name, min, max
                )));
            }
        }
        Ok(())
    }
}

impl SubmittedReadings {
    /// Negative temperatures shifted up by 20, as the edit flows send them
    pub fn with_shifted_temperature(mut self) -> Self {
        self.temperature = shift_negative_temperature(self.temperature);
        self
    }
}

/// Adds 20 to a negative temperature and leaves others untouched
pub fn shift_negative_temperature(temperature: i64) -> i64 {
    if temperature < 0 {
        temperature + 20
    } else {
        temperature
    }
}

/// A supplier's catch batch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatchRecord {
    pub product_id: String,
    pub product_name: String,
    #[serde(default, deserialize_with = "deserialize_lenient_f64")]
    pub quantity: f64,
    #[serde(flatten)]
    pub readings: SensorReadings,
    #[serde(default, deserialize_with = "deserialize_lenient_opt_f64")]
    pub freshness_score: Option<f64>,
    #[serde(default)]
    pub freshness_label: String,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub blockchain_tx_id: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Preservation technique applied by a company
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProcessMethod {
    Freezing,
    #[serde(rename = "Boiling / Blanching")]
    BoilingBlanching,
    Drying,
    Canning,
    Smoking,
    Filleting,
    #[serde(rename = "Vacuum Packaging")]
    VacuumPackaging,
}

impl ProcessMethod {
    pub const ALL: [ProcessMethod; 7] = [
        ProcessMethod::Freezing,
        ProcessMethod::BoilingBlanching,
        ProcessMethod::Drying,
        ProcessMethod::Canning,
        ProcessMethod::Smoking,
        ProcessMethod::Filleting,
        ProcessMethod::VacuumPackaging,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProcessMethod::Freezing => "Freezing",
            ProcessMethod::BoilingBlanching => "Boiling / Blanching",
            ProcessMethod::Drying => "Drying",
            ProcessMethod::Canning => "Canning",
            ProcessMethod::Smoking => "Smoking",
            ProcessMethod::Filleting => "Filleting",
            ProcessMethod::VacuumPackaging => "Vacuum Packaging",
        }
    }
}

impl fmt::Display for ProcessMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProcessMethod {
    type Err = SeaBlockError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted: String = s.chars().filter(|c| c.is_ascii_alphanumeric()).collect();
        ProcessMethod::ALL
            .into_iter()
            .find(|m| {
                let name: String = m.as_str().chars().filter(|c| c.is_ascii_alphanumeric()).collect();
                name.eq_ignore_ascii_case(&wanted)
            })
            .ok_or_else(|| SeaBlockError::Validation(format!("Unknown process method: {}", s)))
    }
}

/// A company's processed batch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessRecord {
    pub product_id: String,
    pub product_name: String,
    #[serde(default, deserialize_with = "deserialize_lenient_f64")]
    pub quantity: f64,
    #[serde(default)]
    pub process_method: String,
    #[serde(flatten)]
    pub readings: SensorReadings,
    #[serde(default, deserialize_with = "deserialize_lenient_opt_f64")]
    pub freshness_score: Option<f64>,
    #[serde(default)]
    pub freshness_label: String,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub blockchain_tx_id: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// A product hand-over recorded on chain
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(default, deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default)]
    pub transaction_id: String,
    pub product_id: String,
    #[serde(deserialize_with = "deserialize_lenient_f64")]
    pub amount: f64,
    #[serde(default)]
    pub freshness: String,
    #[serde(default)]
    pub end_user: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender: Option<String>,
    #[serde(default)]
    pub expiry_date: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// A comment left on a transaction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feedback {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub transaction_id: String,
    #[serde(default, deserialize_with = "deserialize_opt_id")]
    pub user_id: Option<String>,
    #[serde(default)]
    pub username: String,
    pub comment: String,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default, deserialize_with = "deserialize_opt_id")]
    pub user_id: Option<String>,
    pub message: String,
    #[serde(default)]
    pub is_read: bool,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// License uploaded by a company, as listed for regulators
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeCertificate {
    #[serde(default)]
    pub company_name: String,
    #[serde(default)]
    pub company_email: String,
    #[serde(default, deserialize_with = "deserialize_id")]
    pub company_phone: String,
    #[serde(default)]
    pub license: Option<String>,
}

/// Receiving company offered in the transaction form
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Company {
    #[serde(default, deserialize_with = "deserialize_opt_id")]
    pub user_id: Option<String>,
    pub username: String,
    #[serde(default)]
    pub wallet_address: Option<String>,
}

/// Wallet balance held in micro-Algos
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct AlgoBalance(u64);

impl AlgoBalance {
    pub fn from_micro(micro: u64) -> Self {
        Self(micro)
    }

    pub fn micro(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for AlgoBalance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / MICRO_ALGOS;
        // three decimals, rounded half up like toFixed(3)
        let millis = ((self.0 % MICRO_ALGOS) + 500) / 1_000;
        if millis == 1_000 {
            write!(f, "{}.000", whole + 1)
        } else {
            write!(f, "{}.{:03}", whole, millis)
        }
    }
}

/// Reply of `GET /api/balance`
#[derive(Debug, Deserialize)]
pub struct BalanceReply {
    #[serde(default)]
    pub status: String,
    #[serde(default, deserialize_with = "deserialize_micro_algos")]
    pub balance: Option<AlgoBalance>,
}

/// Reply of the verification service for both freshness checks and transfers
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LedgerReply {
    #[serde(default)]
    pub status: String,
    #[serde(default, deserialize_with = "deserialize_lenient_opt_f64")]
    pub freshness_score: Option<f64>,
    #[serde(default)]
    pub freshness_label: Option<String>,
    #[serde(default)]
    pub tx_id: Option<String>,
    #[serde(default, alias = "detail")]
    pub error: Option<String>,
    #[serde(default, deserialize_with = "deserialize_micro_algos")]
    pub wallet_balance: Option<AlgoBalance>,
}

impl LedgerReply {
    pub fn is_success(&self) -> bool {
        self.status == "success"
    }

    pub fn is_spoiled(&self) -> bool {
        self.freshness_label
            .as_deref()
            .map(is_spoiled)
            .unwrap_or(false)
    }

    pub fn is_insufficient_balance(&self) -> bool {
        self.error
            .as_deref()
            .map(|e| e.contains("Insufficient ALGO balance"))
            .unwrap_or(false)
    }
}

pub fn is_spoiled(label: &str) -> bool {
    label == SPOILED_LABEL
}

/// Reply of `GET /api/shared-ledger-distributor`
#[derive(Debug, Default, Deserialize)]
pub struct DistributorLedger {
    #[serde(default, rename = "freshnessRecords")]
    pub freshness_records: Vec<Row>,
    #[serde(default)]
    pub transactions: Vec<Row>,
}

/// Time-based product id (`PID` + unix millis)
pub fn generate_product_id() -> String {
    format!("PID{}", chrono::Utc::now().timestamp_millis())
}

/// A typed record that a record page can list, search and delete
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Identifier used in the record's delete/update URL
    fn record_id(&self) -> String;

    /// Field view of the record, keyed like the backend columns
    fn row(&self) -> Row {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Row::new(),
        }
    }
}

impl Record for CatchRecord {
    fn record_id(&self) -> String {
        self.product_id.clone()
    }
}

impl Record for ProcessRecord {
    fn record_id(&self) -> String {
        self.product_id.clone()
    }
}

impl Record for Transaction {
    fn record_id(&self) -> String {
        self.id.clone()
    }
}

impl Record for TradeCertificate {
    fn record_id(&self) -> String {
        self.company_name.clone()
    }
}

impl Record for User {
    fn record_id(&self) -> String {
        self.id.clone()
    }
}

/// Renders a JSON value the way a string coercion would: strings raw, null empty,
/// whole floats without a trailing `.0`
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() && f.is_finite() => f.to_string(),
            _ => n.to_string(),
        },
        other => other.to_string(),
    }
}
