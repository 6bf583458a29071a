use alloy_sol_types::sol;

sol! {
    #[derive(Debug, PartialEq, Eq)]
    interface IMarketConfigurator {
        /// @notice Forwards `data` to `pool` under the emergency admin role
        function emergencyConfigurePool(address pool, bytes calldata data) external;

        function emergencyConfigureCreditSuite(address creditManager, bytes calldata data) external;

        function emergencyConfigurePriceOracle(address pool, bytes calldata data) external;

        function emergencyConfigureLossPolicy(address pool, bytes calldata data) external;
    }

    #[derive(Debug, PartialEq, Eq)]
    interface IPoolConfigure {
        function pause() external;

        function setCreditManagerDebtLimitToZero(address creditManager) external;

        function setTokenLimitToZero(address token) external;
    }

    #[derive(Debug, PartialEq, Eq)]
    interface ICreditConfigure {
        function pause() external;

        function forbidBorrowing() external;

        function forbidToken(address token) external;

        function forbidAdapter(address adapter) external;
    }

    #[derive(Debug, PartialEq, Eq)]
    interface IPriceOracleConfigure {
        function setPriceFeed(address token, address priceFeed) external;
    }

    #[derive(Debug, PartialEq, Eq)]
    interface ILossPolicyConfigure {
        function setAccessMode(uint8 mode) external;

        function setChecksEnabled(bool enabled) external;
    }

    #[derive(Debug, PartialEq, Eq)]
    interface IMultiPause {
        /// @notice Pauses every pool and credit manager of every market
        function pauseAllContracts() external;

        function pauseMarket(address pool) external;
    }
}
