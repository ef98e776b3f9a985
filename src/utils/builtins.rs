use std::collections::HashMap;

use once_cell::sync::Lazy;

/// Field on the generated object holding the host trading API adapter.
pub const HOST_API_FIELD: &str = "api";

/// Default used for any type tag missing from the table.
pub const ZERO_LITERAL: &str = "0";

// ══════════════════════════════════════════════════════════════
// Catalogues
// ══════════════════════════════════════════════════════════════
//
// Versioned alongside the host adapter surface. Accessors assume the
// adapter is stored under `this.api`.

/// Predefined variables and enum constants → host expression.
static CONSTANTS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        // Market data
        ("Bid", "this.api.getBid()"),
        ("Ask", "this.api.getAsk()"),
        ("Point", "this.api.getPoint()"),
        ("_Point", "this.api.getPoint()"),
        ("Digits", "this.api.getDigits()"),
        ("_Digits", "this.api.getDigits()"),
        ("_Symbol", "this.api.getSymbol()"),
        ("_Period", "this.api.getPeriod()"),
        // Order types
        ("ORDER_TYPE_BUY", "0"),
        ("ORDER_TYPE_SELL", "1"),
        ("ORDER_TYPE_BUY_LIMIT", "2"),
        ("ORDER_TYPE_SELL_LIMIT", "3"),
        ("ORDER_TYPE_BUY_STOP", "4"),
        ("ORDER_TYPE_SELL_STOP", "5"),
        ("POSITION_TYPE_BUY", "0"),
        ("POSITION_TYPE_SELL", "1"),
        // Timeframes
        ("PERIOD_CURRENT", "0"),
        ("PERIOD_M1", "1"),
        ("PERIOD_M5", "5"),
        ("PERIOD_M15", "15"),
        ("PERIOD_M30", "30"),
        ("PERIOD_H1", "16385"),
        ("PERIOD_H4", "16388"),
        ("PERIOD_D1", "16408"),
        // Moving average methods / applied prices
        ("MODE_SMA", "0"),
        ("MODE_EMA", "1"),
        ("MODE_SMMA", "2"),
        ("MODE_LWMA", "3"),
        ("PRICE_CLOSE", "1"),
        ("PRICE_OPEN", "2"),
        ("PRICE_HIGH", "3"),
        ("PRICE_LOW", "4"),
        // Property selectors, passed through by name
        ("SYMBOL_BID", "\"SYMBOL_BID\""),
        ("SYMBOL_ASK", "\"SYMBOL_ASK\""),
        ("SYMBOL_POINT", "\"SYMBOL_POINT\""),
        ("SYMBOL_DIGITS", "\"SYMBOL_DIGITS\""),
        ("ACCOUNT_BALANCE", "\"ACCOUNT_BALANCE\""),
        ("ACCOUNT_EQUITY", "\"ACCOUNT_EQUITY\""),
        ("ACCOUNT_MARGIN_FREE", "\"ACCOUNT_MARGIN_FREE\""),
        ("POSITION_TYPE", "\"POSITION_TYPE\""),
        ("POSITION_PROFIT", "\"POSITION_PROFIT\""),
        ("POSITION_PRICE_OPEN", "\"POSITION_PRICE_OPEN\""),
        ("POSITION_MAGIC", "\"POSITION_MAGIC\""),
        // Status codes / sentinels
        ("INIT_SUCCEEDED", "0"),
        ("INIT_FAILED", "1"),
        ("INVALID_HANDLE", "-1"),
        ("TRADE_RETCODE_DONE", "10009"),
        ("EMPTY_VALUE", "Number.MAX_VALUE"),
        ("NULL", "null"),
    ])
});

/// Built-in functions → qualified host reference.
static FUNCTIONS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        // Trading
        ("OrderSend", "this.api.orderSend"),
        ("OrderClose", "this.api.orderClose"),
        ("OrderModify", "this.api.orderModify"),
        ("OrderSelect", "this.api.orderSelect"),
        ("OrdersTotal", "this.api.ordersTotal"),
        ("PositionSelect", "this.api.positionSelect"),
        ("PositionsTotal", "this.api.positionsTotal"),
        ("PositionGetTicket", "this.api.positionGetTicket"),
        ("PositionGetSymbol", "this.api.positionGetSymbol"),
        ("PositionGetDouble", "this.api.positionGetDouble"),
        ("PositionGetInteger", "this.api.positionGetInteger"),
        // Market / account info
        ("SymbolInfoDouble", "this.api.symbolInfoDouble"),
        ("SymbolInfoInteger", "this.api.symbolInfoInteger"),
        ("AccountInfoDouble", "this.api.accountInfoDouble"),
        ("AccountInfoInteger", "this.api.accountInfoInteger"),
        ("TimeCurrent", "this.api.timeCurrent"),
        // Series
        ("iOpen", "this.api.iOpen"),
        ("iHigh", "this.api.iHigh"),
        ("iLow", "this.api.iLow"),
        ("iClose", "this.api.iClose"),
        ("iTime", "this.api.iTime"),
        ("iVolume", "this.api.iVolume"),
        // Indicators
        ("iMA", "this.api.iMA"),
        ("iRSI", "this.api.iRSI"),
        ("iMACD", "this.api.iMACD"),
        ("iATR", "this.api.iATR"),
        ("iBands", "this.api.iBands"),
        ("iStochastic", "this.api.iStochastic"),
        ("iCustom", "this.api.iCustom"),
        ("CopyBuffer", "this.api.copyBuffer"),
        ("IndicatorRelease", "this.api.indicatorRelease"),
        ("ArraySetAsSeries", "this.api.arraySetAsSeries"),
        // Output
        ("Print", "this.api.print"),
        ("Alert", "this.api.alert"),
        ("Comment", "this.api.comment"),
        // Conversions
        ("NormalizeDouble", "this.api.normalizeDouble"),
        ("DoubleToString", "this.api.doubleToString"),
        ("IntegerToString", "this.api.integerToString"),
        ("StringFormat", "this.api.stringFormat"),
        // Math
        ("MathAbs", "Math.abs"),
        ("MathMax", "Math.max"),
        ("MathMin", "Math.min"),
        ("MathPow", "Math.pow"),
        ("MathSqrt", "Math.sqrt"),
        ("MathFloor", "Math.floor"),
        ("MathCeil", "Math.ceil"),
        ("MathRound", "Math.round"),
    ])
});

/// Lower-cased type tag → default literal.
static TYPE_DEFAULTS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("int", "0"),
        ("uint", "0"),
        ("long", "0"),
        ("ulong", "0"),
        ("short", "0"),
        ("ushort", "0"),
        ("char", "0"),
        ("uchar", "0"),
        ("double", "0.0"),
        ("float", "0.0"),
        ("string", "\"\""),
        ("bool", "false"),
        ("datetime", "0"),
        ("color", "0"),
    ])
});

// ══════════════════════════════════════════════════════════════
// Lookups
// ══════════════════════════════════════════════════════════════

pub fn constant(name: &str) -> Option<&'static str> {
    CONSTANTS.get(name).copied()
}

pub fn function(name: &str) -> Option<&'static str> {
    FUNCTIONS.get(name).copied()
}

/// Default literal for a declared type tag, matched case-insensitively.
/// Unknown tags fall back to [`ZERO_LITERAL`].
pub fn type_default(type_tag: &str) -> &'static str {
    TYPE_DEFAULTS
        .get(type_tag.to_lowercase().as_str())
        .copied()
        .unwrap_or(ZERO_LITERAL)
}

/// Constant catalogue sorted by name.
pub fn constants() -> Vec<(&'static str, &'static str)> {
    sorted(&CONSTANTS)
}

/// Function catalogue sorted by name.
pub fn functions() -> Vec<(&'static str, &'static str)> {
    sorted(&FUNCTIONS)
}

fn sorted(table: &HashMap<&'static str, &'static str>) -> Vec<(&'static str, &'static str)> {
    let mut entries: Vec<_> = table.iter().map(|(k, v)| (*k, *v)).collect();
    entries.sort_unstable_by_key(|(k, _)| *k);
    entries
}
