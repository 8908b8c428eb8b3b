use crate::enums::common::response_envelope;
use crate::services::analytics::{
    AvgOrderValue, BestSellers, DailyRevenue, GrowthRate, MonthlyRevenue, OverallSummary,
};

response_envelope!(MonthlyRevenueResponse, Vec<MonthlyRevenue>);
response_envelope!(OverallSummaryResponse, OverallSummary);
response_envelope!(GrowthRateResponse, GrowthRate);
response_envelope!(BestSellersResponse, BestSellers);
response_envelope!(DailyRevenueResponse, Vec<DailyRevenue>);
response_envelope!(AvgOrderValueResponse, AvgOrderValue);
