//! 정규화된(canonical) 컬럼 이름.
//!
//! 브로커별로 제각각인 헤더는 정규화 이후 아래 이름 중 하나로 매핑됩니다.
//! 매핑되지 않은 헤더는 대문자화된 형태 그대로 통과합니다.

// 가격 시계열
pub const DATE: &str = "Date";
pub const DAY: &str = "Day";
pub const WEEKDAY: &str = "Weekday";
pub const OPEN: &str = "Open";
pub const HIGH: &str = "High";
pub const LOW: &str = "Low";
pub const CLOSE: &str = "Close";
pub const PREV_CLOSE: &str = "Prev_Close";
pub const VWAP: &str = "VWAP";
pub const HIGH_52W: &str = "High_52W";
pub const LOW_52W: &str = "Low_52W";
pub const VOLUME: &str = "Volume";
pub const VALUE: &str = "Value";
pub const TRADES: &str = "Trades";
pub const SERIES: &str = "Series";
pub const CHANGE_PCT: &str = "Change_Pct";

// 매매 기록
pub const INSTRUMENT: &str = "Instrument";
pub const OPTION_SIDE: &str = "Option_Side";
pub const STRIKE: &str = "Strike";
pub const PROFIT_LOSS: &str = "Profit_Loss";
pub const RETURN_PCT: &str = "Return_Pct";
pub const EXIT_PRICE: &str = "Exit_Price";

// 옵션 체인 (wide 형식, CALL 쪽)
pub const CALL_OI: &str = "Call_OI";
pub const CALL_OI_CHANGE: &str = "Call_OI_Change";
pub const CALL_VOLUME: &str = "Call_Volume";
pub const CALL_IV: &str = "Call_IV";
pub const CALL_LTP: &str = "Call_LTP";
pub const CALL_CHNG: &str = "Call_Chng";
pub const CALL_BID_QTY: &str = "Call_Bid_Qty";
pub const CALL_BID: &str = "Call_Bid";
pub const CALL_ASK: &str = "Call_Ask";
pub const CALL_ASK_QTY: &str = "Call_Ask_Qty";

// 옵션 체인 (wide 형식, PUT 쪽)
pub const PUT_OI: &str = "Put_OI";
pub const PUT_OI_CHANGE: &str = "Put_OI_Change";
pub const PUT_VOLUME: &str = "Put_Volume";
pub const PUT_IV: &str = "Put_IV";
pub const PUT_LTP: &str = "Put_LTP";
pub const PUT_CHNG: &str = "Put_Chng";
pub const PUT_BID_QTY: &str = "Put_Bid_Qty";
pub const PUT_BID: &str = "Put_Bid";
pub const PUT_ASK: &str = "Put_Ask";
pub const PUT_ASK_QTY: &str = "Put_Ask_Qty";

/// wide 옵션 체인의 CALL 쪽 필드 (원본 헤더 순서).
pub const CHAIN_CALL_FIELDS: [&str; 10] = [
    CALL_OI,
    CALL_OI_CHANGE,
    CALL_VOLUME,
    CALL_IV,
    CALL_LTP,
    CALL_CHNG,
    CALL_BID_QTY,
    CALL_BID,
    CALL_ASK,
    CALL_ASK_QTY,
];

/// wide 옵션 체인의 PUT 쪽 필드.
pub const CHAIN_PUT_FIELDS: [&str; 10] = [
    PUT_OI,
    PUT_OI_CHANGE,
    PUT_VOLUME,
    PUT_IV,
    PUT_LTP,
    PUT_CHNG,
    PUT_BID_QTY,
    PUT_BID,
    PUT_ASK,
    PUT_ASK_QTY,
];
